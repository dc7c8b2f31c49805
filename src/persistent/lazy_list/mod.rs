//! Lazily evaluated persistent singly-linked list.
//!
//! This module provides [`LazyList`], a cons list whose elements and tails
//! are both suspended in [`Thunk`]s. Nothing is computed until a consumer
//! asks for it, and whatever is computed is memoized, so clones and
//! derived lists that share a cell never evaluate it twice.
//!
//! # Overview
//!
//! - Construction: [`cons`](LazyList::cons), [`empty`](LazyList::empty),
//!   [`continually`](LazyList::continually), [`iterate`](LazyList::iterate),
//!   [`count_from`](LazyList::count_from), [`unfold`](LazyList::unfold),
//!   [`cycle`](LazyList::cycle), `FromIterator`, and
//!   [`recursive`](LazyList::recursive) for lists that refer back to
//!   themselves.
//! - The one recursion scheme: [`fold_right`](LazyList::fold_right), whose
//!   continuation is itself suspended, so the step function decides how much
//!   of the list is ever visited.
//! - Derived operations built on it: `exists`, `for_all`, `find`,
//!   `head_option`, `take_while`, `append`, `map`, `filter`, `flat_map`.
//! - The strict boundary: [`to_list`](LazyList::to_list) materializes a
//!   finite list without growing the stack.
//!
//! Lists may be infinite. Operations that short-circuit or bound their
//! consumption are safe on them; strict ones (`to_list`, `length`,
//! `reverse`, `fold_left`) never return on an infinite list.
//!
//! # Examples
//!
//! ```rust
//! use lazylist::persistent::LazyList;
//!
//! let naturals = LazyList::count_from(0_u64);
//! let evens = naturals.filter(|n| n % 2 == 0);
//!
//! assert_eq!(evens.take(4).to_vec(), vec![0, 2, 4, 6]);
//! assert_eq!(evens.find(|n| *n > 100), Some(102));
//! ```

use std::fmt;
use std::ops::Add;
use std::rc::Rc;

use crate::control::Thunk;
use crate::trace::{self, ForceEvent, NodeId, ThunkRole};

mod fold;
mod iter;
mod knot;
mod ops;

pub use fold::Rest;
pub use iter::Iter;
pub use knot::Knot;

/// A lazily evaluated, persistent, possibly infinite sequence.
///
/// A `LazyList<A>` is either empty or a cons cell holding a suspended head
/// and a suspended tail. Cloning is O(1) and shares every cell.
///
/// `LazyList` is single-threaded: it is neither `Send` nor `Sync`.
///
/// # Examples
///
/// ```rust
/// use lazylist::persistent::LazyList;
///
/// let list = LazyList::cons(|| 1, || LazyList::cons(|| 2, LazyList::empty));
/// assert_eq!(list.to_vec(), vec![1, 2]);
///
/// // Infinite, yet usable with bounded consumers
/// let ones = LazyList::continually(1);
/// assert!(ones.exists(|x| *x == 1));
/// assert_eq!(ones.take(5).to_vec(), vec![1, 1, 1, 1, 1]);
/// ```
pub struct LazyList<A> {
    cell: Option<Rc<ConsCell<A>>>,
}

struct ConsCell<A> {
    id: NodeId,
    head: Rc<Thunk<A>>,
    tail: TailLink<A>,
}

enum TailLink<A> {
    Deferred(Thunk<LazyList<A>>),
    /// Continues with the front of a tied list, which this cell does not own.
    Knot(Knot<A>),
}

impl<A> ConsCell<A> {
    fn head(&self) -> &A {
        self.head.force()
    }

    fn tail(&self) -> LazyList<A> {
        match &self.tail {
            TailLink::Deferred(thunk) => thunk.force().clone(),
            TailLink::Knot(knot) => {
                trace::emit(ForceEvent::Cached {
                    role: ThunkRole::Tail(self.id),
                });
                knot.list()
            }
        }
    }

    /// Moves an already evaluated tail out of the cell.
    fn detach_tail(&mut self) -> Option<Rc<Self>> {
        match &mut self.tail {
            TailLink::Deferred(thunk) => thunk.take_value().and_then(|mut list| list.cell.take()),
            TailLink::Knot(_) => None,
        }
    }
}

impl<A> LazyList<A> {
    /// Returns the empty list.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self { cell: None }
    }

    /// Returns whether this is the empty list. Forces nothing.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.cell.is_none()
    }

    /// Returns the identifier of the first cell, as reported in trace events.
    pub fn node_id(&self) -> Option<NodeId> {
        self.cell.as_ref().map(|cell| cell.id)
    }

    /// Returns whether the first element has been evaluated.
    pub fn is_head_evaluated(&self) -> bool {
        self.cell
            .as_ref()
            .is_some_and(|cell| cell.head.is_evaluated())
    }

    /// Returns whether the remainder after the first cell is known.
    pub fn is_tail_evaluated(&self) -> bool {
        self.cell.as_ref().is_some_and(|cell| match &cell.tail {
            TailLink::Deferred(thunk) => thunk.is_evaluated(),
            TailLink::Knot(_) => true,
        })
    }

    /// Returns the remainder after the first element, forcing only the tail.
    ///
    /// Returns `None` for the empty list.
    pub fn tail(&self) -> Option<Self> {
        self.cell.as_ref().map(|cell| cell.tail())
    }

    const fn from_cell(cell: Rc<ConsCell<A>>) -> Self {
        Self { cell: Some(cell) }
    }
}

impl<A: 'static> LazyList<A> {
    /// Builds a cons cell from a suspended head and a suspended tail.
    ///
    /// Neither closure is called here; each runs at most once, the first
    /// time its part of the list is needed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let calls = Rc::new(Cell::new(0));
    /// let counter = Rc::clone(&calls);
    /// let list = LazyList::cons(
    ///     move || {
    ///         counter.set(counter.get() + 1);
    ///         "head"
    ///     },
    ///     LazyList::empty,
    /// );
    ///
    /// assert_eq!(calls.get(), 0);
    /// assert_eq!(list.head(), Some("head"));
    /// assert_eq!(list.head(), Some("head"));
    /// assert_eq!(calls.get(), 1);
    /// ```
    pub fn cons<H, T>(head: H, tail: T) -> Self
    where
        H: Fn() -> A + 'static,
        T: Fn() -> Self + 'static,
    {
        let id = NodeId::fresh();
        Self::link(id, Rc::new(Thunk::with_role(ThunkRole::Head(id), head)), tail)
    }

    /// Builds a cons cell whose head is already known.
    pub fn cons_value<T>(head: A, tail: T) -> Self
    where
        T: Fn() -> Self + 'static,
    {
        let id = NodeId::fresh();
        Self::link(
            id,
            Rc::new(Thunk::evaluated_with_role(ThunkRole::Head(id), head)),
            tail,
        )
    }

    /// Returns a list with `element` in front of `self`.
    ///
    /// Both parts are already known, so nothing is suspended.
    #[must_use]
    pub fn prepend(&self, element: A) -> Self {
        let id = NodeId::fresh();
        Self::from_cell(Rc::new(ConsCell {
            id,
            head: Rc::new(Thunk::evaluated_with_role(ThunkRole::Head(id), element)),
            tail: TailLink::Deferred(Thunk::evaluated_with_role(
                ThunkRole::Tail(id),
                self.clone(),
            )),
        }))
    }

    /// Returns a one-element list.
    pub fn singleton(element: A) -> Self {
        Self::cons_value(element, Self::empty)
    }

    /// Builds a list that may refer back to its own front.
    ///
    /// `build` receives a [`Knot`], a weak handle to the list being built.
    /// A cell made with [`cons_knot`](Self::cons_knot) continues with that
    /// list, closing the cycle. No cell of the cycle owns the front, so the
    /// whole list is freed once the last outside handle is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let tick_tock = LazyList::recursive(|this| {
    ///     let this = this.clone();
    ///     LazyList::cons_value("tick", move || LazyList::cons_knot(|| "tock", &this))
    /// });
    ///
    /// assert_eq!(tick_tock.take(3).to_vec(), vec!["tick", "tock", "tick"]);
    /// assert_eq!(tick_tock.drop_first(2).node_id(), tick_tock.node_id());
    /// ```
    pub fn recursive<F>(build: F) -> Self
    where
        F: Fn(&Knot<A>) -> Self + 'static,
    {
        Knot::tie(Rc::new(build))
    }

    /// Builds a cons cell whose tail is the list `knot` points at.
    ///
    /// The tail is never suspended: forcing it only resolves the knot.
    pub fn cons_knot<H>(head: H, knot: &Knot<A>) -> Self
    where
        H: Fn() -> A + 'static,
    {
        let id = NodeId::fresh();
        Self::from_cell(Rc::new(ConsCell {
            id,
            head: Rc::new(Thunk::with_role(ThunkRole::Head(id), head)),
            tail: TailLink::Knot(knot.clone()),
        }))
    }

    /// Builds a cell around an existing head thunk, so a derived list shares
    /// the memoized element with its source.
    fn link<T>(id: NodeId, head: Rc<Thunk<A>>, tail: T) -> Self
    where
        T: Fn() -> Self + 'static,
    {
        Self::from_cell(Rc::new(ConsCell {
            id,
            head,
            tail: TailLink::Deferred(Thunk::with_role(ThunkRole::Tail(id), tail)),
        }))
    }
}

impl<A: Clone> LazyList<A> {
    /// Returns the first element, forcing only the head.
    pub fn head(&self) -> Option<A> {
        self.cell.as_ref().map(|cell| cell.head().clone())
    }

    /// Splits the list into its first element and the remainder.
    pub fn uncons(&self) -> Option<(A, Self)> {
        self.cell
            .as_ref()
            .map(|cell| (cell.head().clone(), cell.tail()))
    }
}

impl<A: Clone + 'static> LazyList<A> {
    /// The infinite list repeating `element`.
    ///
    /// This is a single cell tied back to itself with
    /// [`recursive`](Self::recursive), so the cell is freed as soon as the
    /// last outside handle goes away.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let ones = LazyList::continually(1);
    /// let rest = ones.tail().unwrap();
    /// assert_eq!(ones.node_id(), rest.node_id());
    /// ```
    pub fn continually(element: A) -> Self {
        Self::recursive(move |this| {
            let element = element.clone();
            Self::cons_knot(move || element.clone(), this)
        })
    }

    /// The infinite list repeating `elements` in order.
    ///
    /// An empty input gives the empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let signal = LazyList::cycle(["red", "green"]);
    /// assert_eq!(signal.take(5).to_vec(), vec!["red", "green", "red", "green", "red"]);
    /// ```
    pub fn cycle<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = A>,
    {
        Self::cycle_from(elements.into_iter().collect(), 0)
    }

    fn cycle_from(elements: Rc<[A]>, index: usize) -> Self {
        if elements.is_empty() {
            return Self::empty();
        }
        let source = Rc::clone(&elements);
        Self::cons(
            move || source[index].clone(),
            move || Self::cycle_from(Rc::clone(&elements), (index + 1) % elements.len()),
        )
    }

    /// The infinite list `seed, step(seed), step(step(seed)), ...`.
    pub fn iterate<F>(seed: A, step: F) -> Self
    where
        F: Fn(&A) -> A + 'static,
    {
        Self::iterate_shared(seed, Rc::new(step))
    }

    fn iterate_shared(seed: A, step: Rc<dyn Fn(&A) -> A>) -> Self {
        let current = seed.clone();
        Self::cons(
            move || seed.clone(),
            move || Self::iterate_shared(step(&current), Rc::clone(&step)),
        )
    }

    /// The infinite list `start, start + 1, start + 2, ...`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// assert_eq!(LazyList::count_from(5_i32).take(3).to_vec(), vec![5, 6, 7]);
    /// ```
    pub fn count_from(start: A) -> Self
    where
        A: Add<Output = A> + From<u8>,
    {
        Self::iterate(start, |current| current.clone() + A::from(1_u8))
    }

    /// Builds a list by repeatedly applying `step` to a state.
    ///
    /// `step` returns the next element together with the next state, or
    /// `None` to end the list. It runs once for the first cell right away,
    /// and once per further cell when that cell's predecessor tail is forced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let countdown = LazyList::unfold(3, |n| (*n > 0).then(|| (*n, n - 1)));
    /// assert_eq!(countdown.to_vec(), vec![3, 2, 1]);
    /// ```
    pub fn unfold<S, F>(seed: S, step: F) -> Self
    where
        S: 'static,
        F: Fn(&S) -> Option<(A, S)> + 'static,
    {
        let step: Rc<dyn Fn(&S) -> Option<(A, S)>> = Rc::new(step);
        Self::unfold_shared(&seed, &step)
    }

    fn unfold_shared<S: 'static>(seed: &S, step: &Rc<dyn Fn(&S) -> Option<(A, S)>>) -> Self {
        match step(seed) {
            None => Self::empty(),
            Some((element, next)) => {
                let step = Rc::clone(step);
                Self::cons_value(element, move || Self::unfold_shared(&next, &step))
            }
        }
    }

    fn from_shared(elements: Rc<[A]>, index: usize) -> Self {
        if index >= elements.len() {
            return Self::empty();
        }
        let source = Rc::clone(&elements);
        Self::cons(
            move || source[index].clone(),
            move || Self::from_shared(Rc::clone(&elements), index + 1),
        )
    }
}

impl<A> Clone for LazyList<A> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<A> Default for LazyList<A> {
    fn default() -> Self {
        Self::empty()
    }
}

// A fully forced list is a chain of memoized tails; dropping it recursively
// would use one stack frame per cell.
impl<A> Drop for LazyList<A> {
    fn drop(&mut self) {
        let mut next = self.cell.take();
        while let Some(cell) = next {
            next = Rc::try_unwrap(cell)
                .ok()
                .and_then(|mut cell| cell.detach_tail());
        }
    }
}

impl<A: Clone + 'static> FromIterator<A> for LazyList<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self::from_shared(iter.into_iter().collect(), 0)
    }
}

impl<A: Clone + 'static> From<Vec<A>> for LazyList<A> {
    fn from(elements: Vec<A>) -> Self {
        Self::from_shared(Rc::from(elements), 0)
    }
}

struct Marker(&'static str);

impl fmt::Debug for Marker {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.0)
    }
}

/// Shows the evaluated prefix without forcing anything.
///
/// Unevaluated heads print as `?`, an unevaluated tail as `..`, and a tail
/// made with [`cons_knot`](LazyList::cons_knot) as `<cycle>`.
///
/// ```rust
/// use lazylist::persistent::LazyList;
///
/// let list: LazyList<i32> = vec![1, 2, 3].into();
/// assert_eq!(format!("{list:?}"), "[?, ..]");
/// list.nth(1);
/// assert_eq!(format!("{list:?}"), "[?, 2, ..]");
/// ```
impl<A: fmt::Debug> fmt::Debug for LazyList<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = formatter.debug_list();
        let mut current = self.cell.clone();
        while let Some(cell) = current {
            match cell.head.get() {
                Some(element) => entries.entry(element),
                None => entries.entry(&Marker("?")),
            };
            current = match &cell.tail {
                TailLink::Deferred(thunk) => match thunk.get() {
                    Some(rest) => rest.cell.clone(),
                    None => {
                        entries.entry(&Marker(".."));
                        None
                    }
                },
                TailLink::Knot(_) => {
                    entries.entry(&Marker("<cycle>"));
                    None
                }
            };
        }
        entries.finish()
    }
}

static_assertions::assert_not_impl_any!(LazyList<i32>: Send, Sync);
