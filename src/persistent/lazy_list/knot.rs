//! Periodic lists whose cells do not own each other in a cycle.

use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::{ConsCell, LazyList};

type Build<A> = Rc<dyn Fn(&Knot<A>) -> LazyList<A>>;

struct Tie<A> {
    front: OnceCell<Weak<ConsCell<A>>>,
    building: Cell<bool>,
    build: Build<A>,
}

/// A weak handle to the front of a list built by
/// [`LazyList::recursive`].
///
/// A cell made with [`LazyList::cons_knot`] continues with the list the knot
/// points at, which closes a cycle while every strong reference still points
/// away from the front. Dropping the last outside handle therefore frees the
/// whole cycle.
pub struct Knot<A> {
    tie: Rc<Tie<A>>,
}

impl<A> Knot<A> {
    pub(super) fn tie(build: Build<A>) -> LazyList<A> {
        let tie = Rc::new(Tie {
            front: OnceCell::new(),
            building: Cell::new(true),
            build,
        });
        let list = (tie.build)(&Self {
            tie: Rc::clone(&tie),
        });
        tie.building.set(false);
        if let Some(cell) = &list.cell {
            tie.front.get_or_init(|| Rc::downgrade(cell));
        }
        list
    }

    /// Returns the list this knot points at.
    ///
    /// When every handle to the front has been dropped, for example because
    /// only a later cell of the cycle is still held, the list is built again
    /// from the same function. It denotes the same sequence; only its
    /// memoized elements are recomputed.
    ///
    /// The result is a strong handle. Memoizing a list derived from it inside
    /// the list it points at creates a reference cycle; use
    /// [`LazyList::cons_knot`] for the link that closes the cycle.
    ///
    /// # Panics
    ///
    /// Panics when called while the list is still being built, which would
    /// otherwise recurse forever.
    pub fn list(&self) -> LazyList<A> {
        if let Some(cell) = self.tie.front.get().and_then(Weak::upgrade) {
            return LazyList::from_cell(cell);
        }
        assert!(
            !self.tie.building.get(),
            "knot resolved before its list was built"
        );
        tracing::debug!("front of a tied list was dropped; rebuilding it");
        Self::tie(Rc::clone(&self.tie.build))
    }
}

impl<A> Clone for Knot<A> {
    fn clone(&self) -> Self {
        Self {
            tie: Rc::clone(&self.tie),
        }
    }
}

impl<A> fmt::Debug for Knot<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Knot")
            .field("tied", &self.tie.front.get().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn alternating<A: Clone + 'static>(first: A, second: A) -> LazyList<A> {
        LazyList::recursive(move |this| {
            let this = this.clone();
            let second = second.clone();
            LazyList::cons_value(first.clone(), move || {
                let second = second.clone();
                LazyList::cons_knot(move || second.clone(), &this)
            })
        })
    }

    #[rstest]
    fn test_recursive_ties_a_cycle() {
        let list = alternating(1, 2);
        assert_eq!(list.take(5).to_vec(), vec![1, 2, 1, 2, 1]);
    }

    #[rstest]
    fn test_knot_returns_to_the_front() {
        let list = alternating('a', 'b');
        let back = list.drop_first(2);
        assert_eq!(back.node_id(), list.node_id());
    }

    #[rstest]
    fn test_recursive_is_freed() {
        let marker = Rc::new(());
        let list = alternating(Rc::clone(&marker), Rc::clone(&marker));
        assert_eq!(list.take(7).length(), 7);
        drop(list);
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[rstest]
    fn test_knot_rebuilds_a_dropped_front() {
        let list = alternating(1, 2);
        let second = list.tail().unwrap();
        drop(list);

        assert_eq!(second.take(4).to_vec(), vec![2, 1, 2, 1]);
    }

    #[rstest]
    fn test_recursive_on_empty_build() {
        let list: LazyList<i32> = LazyList::recursive(|_| LazyList::empty());
        assert!(list.is_empty());
    }

    #[rstest]
    #[should_panic(expected = "knot resolved before its list was built")]
    fn test_knot_resolved_while_building_panics() {
        let _ = LazyList::<i32>::recursive(Knot::list);
    }

    #[rstest]
    fn test_debug_stops_at_the_knot() {
        let list = LazyList::recursive(|this| LazyList::cons_knot(|| 0, this));
        let _ = list.head();
        assert_eq!(format!("{list:?}"), "[0, <cycle>]");
    }
}
