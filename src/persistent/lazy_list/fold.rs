//! Folds and strict materialization.

use std::fmt;
use std::rc::Rc;

use super::LazyList;
use crate::persistent::PersistentList;
use crate::trace::{self, ForceEvent};

/// The suspended remainder of a [`LazyList::fold_right`].
///
/// A step function receives the current element and a `Rest` standing for
/// the fold over everything after it. Nothing beyond the current cell is
/// touched until [`force`](Rest::force) is called, so a step that returns
/// without forcing ends the traversal on the spot.
///
/// `Rest` is cheap to clone; every clone resumes the same continuation.
pub struct Rest<'a, B> {
    resume: Rc<dyn Fn() -> B + 'a>,
    depth: usize,
}

impl<'a, B> Rest<'a, B> {
    fn new<F>(depth: usize, resume: F) -> Self
    where
        F: Fn() -> B + 'a,
    {
        Self {
            resume: Rc::new(resume),
            depth,
        }
    }

    /// Continues the fold over the remainder of the list.
    pub fn force(self) -> B {
        tracing::trace!(depth = self.depth, "resuming right fold");
        trace::emit(ForceEvent::Resumed { depth: self.depth });
        (self.resume)()
    }

    /// Number of cells before the remainder this `Rest` stands for.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

impl<B> Clone for Rest<'_, B> {
    fn clone(&self) -> Self {
        Self {
            resume: Rc::clone(&self.resume),
            depth: self.depth,
        }
    }
}

impl<B> fmt::Debug for Rest<'_, B> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Rest")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

fn fold_right_from<'a, A, B, Z, F>(list: &LazyList<A>, seed: &Rc<Z>, step: &Rc<F>, depth: usize) -> B
where
    A: Clone + 'static,
    B: 'a,
    Z: Fn() -> B + 'a,
    F: Fn(A, Rest<'a, B>) -> B + 'a,
{
    let Some(cell) = list.cell.clone() else {
        tracing::trace!(depth, "right fold reached the end");
        trace::emit(ForceEvent::FoldEnd { depth });
        return seed();
    };

    let head = cell.head().clone();
    trace::emit(ForceEvent::FoldStep { depth });

    let next_seed = Rc::clone(seed);
    let next_step = Rc::clone(step);
    let rest = Rest::new(depth + 1, move || {
        fold_right_from(&cell.tail(), &next_seed, &next_step, depth + 1)
    });
    step(head, rest)
}

impl<A: Clone + 'static> LazyList<A> {
    /// Lazy right fold.
    ///
    /// For a cons cell, forces the head and calls `step(head, rest)`, where
    /// `rest` suspends the fold over the tail. The tail itself is not forced
    /// until `rest` is. For the empty list, calls `seed`.
    ///
    /// Short-circuiting consumers simply return without forcing `rest`, which
    /// makes them terminate on infinite lists as soon as the answer is known.
    /// Each forced `rest` nests one more call, so a step that always forces
    /// uses stack proportional to the prefix it visits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let list: LazyList<i32> = vec![1, 2, 3].into();
    /// let sum = list.fold_right(|| 0, |element, rest| element + rest.force());
    /// assert_eq!(sum, 6);
    ///
    /// // Stops at the first even number, even though the list is infinite
    /// let first_even = LazyList::count_from(1_i32)
    ///     .fold_right(|| None, |element, rest| {
    ///         if element % 2 == 0 { Some(element) } else { rest.force() }
    ///     });
    /// assert_eq!(first_even, Some(2));
    /// ```
    pub fn fold_right<'a, B, Z, F>(&self, seed: Z, step: F) -> B
    where
        B: 'a,
        Z: Fn() -> B + 'a,
        F: Fn(A, Rest<'a, B>) -> B + 'a,
    {
        fold_right_from(self, &Rc::new(seed), &Rc::new(step), 0)
    }

    /// Strict left fold, front to back, in constant stack.
    ///
    /// Never returns on an infinite list.
    pub fn fold_left<B, F>(&self, init: B, function: F) -> B
    where
        F: FnMut(B, A) -> B,
    {
        self.iter().fold(init, function)
    }

    /// Forces the whole list into a [`PersistentList`], preserving order.
    ///
    /// Each forced element is prepended to an accumulator and the
    /// accumulator is reversed once at the end. Both passes are loops, so
    /// the stack stays flat for lists of any length.
    ///
    /// Never returns on an infinite list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let list = LazyList::count_from(0_u32).take(100_000).to_list();
    /// assert_eq!(list.len(), 100_000);
    /// assert_eq!(list.head(), Some(&0));
    /// ```
    pub fn to_list(&self) -> PersistentList<A> {
        let reversed = self.fold_left(PersistentList::new(), |accumulator, element| {
            accumulator.cons(element)
        });
        tracing::debug!(length = reversed.len(), "materialized lazy list");
        reversed.reverse()
    }

    /// Forces the whole list into a `Vec`, preserving order.
    pub fn to_vec(&self) -> Vec<A> {
        self.iter().collect()
    }

    /// Returns the elements in reverse order, forcing the whole list.
    ///
    /// Every cell of the result is already evaluated.
    #[must_use]
    pub fn reverse(&self) -> Self {
        self.fold_left(Self::empty(), |reversed, element| reversed.prepend(element))
    }

    /// Counts the elements, forcing every tail and head.
    pub fn length(&self) -> usize {
        self.iter().count()
    }
}
