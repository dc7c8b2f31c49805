//! Operations derived from the lazy right fold.
//!
//! Queries (`exists`, `for_all`, `find`, `head_option`) stop folding as soon
//! as the answer is known. Transformations (`map`, `filter`, `take_while`,
//! `append`, `flat_map`) produce a new lazy list whose tail resumes the fold
//! only when it is itself forced, so they are safe on infinite input.

use std::rc::Rc;

use super::LazyList;
use crate::trace::NodeId;

impl<A: Clone + 'static> LazyList<A> {
    /// Returns whether any element satisfies `predicate`.
    ///
    /// Forces heads front to back and stops at the first match, so it
    /// terminates on an infinite list that contains one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// assert!(LazyList::count_from(0_u32).exists(|n| *n == 10));
    /// assert!(!LazyList::from(vec![1, 3, 5]).exists(|n| n % 2 == 0));
    /// ```
    pub fn exists<P>(&self, predicate: P) -> bool
    where
        P: Fn(&A) -> bool,
    {
        self.fold_right(|| false, |element, rest| predicate(&element) || rest.force())
    }

    /// Returns whether every element satisfies `predicate`.
    ///
    /// Stops at the first counterexample. True for the empty list.
    pub fn for_all<P>(&self, predicate: P) -> bool
    where
        P: Fn(&A) -> bool,
    {
        self.fold_right(|| true, |element, rest| predicate(&element) && rest.force())
    }

    /// Returns the first element satisfying `predicate`.
    pub fn find<P>(&self, predicate: P) -> Option<A>
    where
        P: Fn(&A) -> bool,
    {
        self.fold_right(
            || None,
            |element, rest| {
                if predicate(&element) {
                    Some(element)
                } else {
                    rest.force()
                }
            },
        )
    }

    /// Returns the first element, expressed as a fold that never resumes.
    ///
    /// Forces exactly one head and no tail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let list = LazyList::cons(|| 1, || panic!("never forced"));
    /// assert_eq!(list.head_option(), Some(1));
    /// ```
    pub fn head_option(&self) -> Option<A> {
        self.fold_right(|| None, |element, _| Some(element))
    }

    /// Returns the longest prefix whose elements satisfy `predicate`.
    ///
    /// Lazy: elements are tested only as the result is consumed, and the
    /// first failing element ends the result without looking further.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let small = LazyList::count_from(1_u32).take_while(|n| *n < 4);
    /// assert_eq!(small.to_vec(), vec![1, 2, 3]);
    /// ```
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&A) -> bool + 'static,
    {
        self.fold_right(Self::empty, move |element, rest| {
            if predicate(&element) {
                Self::cons_value(element, move || rest.clone().force())
            } else {
                Self::empty()
            }
        })
    }

    /// Returns `self` followed by the list produced by `other`.
    ///
    /// `other` is called only once the elements of `self` are exhausted, and
    /// never if the result is not consumed that far. The element type may
    /// widen: any `A` that converts into `B` can be appended to a list of
    /// `B`. It cannot narrow.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let small: LazyList<u8> = vec![1, 2].into();
    /// let large: LazyList<u64> = vec![300].into();
    /// let joined: LazyList<u64> = small.append(move || large.clone());
    /// assert_eq!(joined.to_vec(), vec![1, 2, 300]);
    ///
    /// let endless: LazyList<u64> = LazyList::count_from(0_u64).append(|| panic!("never reached"));
    /// assert_eq!(endless.take(3).to_vec(), vec![0, 1, 2]);
    /// ```
    ///
    /// Appending to a narrower element type is rejected:
    ///
    /// ```rust,compile_fail
    /// use lazylist::persistent::LazyList;
    ///
    /// let small: LazyList<u8> = vec![1, 2].into();
    /// let large: LazyList<u64> = vec![300].into();
    /// let narrowed: LazyList<u8> = small.append(move || large.clone());
    /// ```
    pub fn append<B, O>(&self, other: O) -> LazyList<B>
    where
        A: Into<B>,
        B: Clone + 'static,
        O: Fn() -> LazyList<B> + 'static,
    {
        self.fold_right(other, |element, rest| {
            LazyList::cons_value(element.into(), move || rest.clone().force())
        })
    }

    /// Views this list as a list of a wider element type.
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let bytes: LazyList<u8> = vec![1, 2].into();
    /// let wide: LazyList<i64> = bytes.widen();
    /// assert_eq!(wide.to_vec(), vec![1_i64, 2]);
    /// ```
    pub fn widen<B>(&self) -> LazyList<B>
    where
        A: Into<B>,
        B: 'static,
    {
        self.map(Into::into)
    }

    /// Applies `function` to every element, lazily.
    ///
    /// The result's heads are themselves suspended: `function` runs for an
    /// element only when that element of the result is forced.
    pub fn map<B, G>(&self, function: G) -> LazyList<B>
    where
        B: 'static,
        G: Fn(A) -> B + 'static,
    {
        let function = Rc::new(function);
        self.fold_right(LazyList::empty, move |element, rest| {
            let function = Rc::clone(&function);
            LazyList::cons(move || function(element.clone()), move || rest.clone().force())
        })
    }

    /// Keeps the elements satisfying `predicate`, lazily.
    ///
    /// Forcing one cell of the result scans forward to the next match, so on
    /// an infinite list with no further matches that scan never ends.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&A) -> bool + 'static,
    {
        self.fold_right(Self::empty, move |element, rest| {
            if predicate(&element) {
                Self::cons_value(element, move || rest.clone().force())
            } else {
                rest.force()
            }
        })
    }

    /// Maps every element to a list and concatenates the results, lazily.
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let list = LazyList::count_from(1_u32).flat_map(|n| LazyList::cycle([n]).take(n as usize));
    /// assert_eq!(list.take(6).to_vec(), vec![1, 2, 2, 3, 3, 3]);
    /// ```
    pub fn flat_map<B, G>(&self, function: G) -> LazyList<B>
    where
        B: Clone + 'static,
        G: Fn(A) -> LazyList<B> + 'static,
    {
        self.fold_right(LazyList::empty, move |element, rest| {
            function(element).append(move || rest.clone().force())
        })
    }

    /// Returns at most the first `count` elements.
    ///
    /// The result shares its head thunks with `self`, so forcing an element
    /// through either list evaluates it for both. The source tail after the
    /// last taken cell is never forced.
    ///
    /// The cells of the result are new and get their own [`NodeId`]s, which
    /// their tail events carry. A shared head keeps the role it was created
    /// with, so its events name the source cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let ones = LazyList::continually(1);
    /// assert_eq!(ones.take(5).to_vec(), vec![1, 1, 1, 1, 1]);
    /// assert!(ones.take(0).is_empty());
    /// ```
    pub fn take(&self, count: usize) -> Self {
        match &self.cell {
            Some(cell) if count > 1 => {
                let source = Rc::clone(cell);
                Self::link(NodeId::fresh(), Rc::clone(&cell.head), move || {
                    source.tail().take(count - 1)
                })
            }
            Some(cell) if count == 1 => {
                Self::link(NodeId::fresh(), Rc::clone(&cell.head), Self::empty)
            }
            _ => Self::empty(),
        }
    }

    /// Skips the first `count` elements, forcing tails but no heads.
    pub fn drop_first(&self, count: usize) -> Self {
        let mut current = self.clone();
        for _ in 0..count {
            match current.tail() {
                Some(rest) => current = rest,
                None => break,
            }
        }
        current
    }

    /// Returns the element at `index`, forcing only that head.
    pub fn nth(&self, index: usize) -> Option<A> {
        self.drop_first(index).head()
    }

    /// Pairs up elements of two lists, ending with the shorter one.
    pub fn zip<B>(&self, other: &LazyList<B>) -> LazyList<(A, B)>
    where
        B: Clone + 'static,
    {
        self.zip_with(other, |left, right| (left, right))
    }

    /// Combines elements of two lists pairwise, ending with the shorter one.
    ///
    /// Each combined element is computed only when it is forced.
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let sums = LazyList::count_from(0_u32).zip_with(&LazyList::from(vec![10, 20]), |a, b| a + b);
    /// assert_eq!(sums.to_vec(), vec![10, 21]);
    /// ```
    pub fn zip_with<B, C, G>(&self, other: &LazyList<B>, function: G) -> LazyList<C>
    where
        B: Clone + 'static,
        C: 'static,
        G: Fn(A, B) -> C + 'static,
    {
        let function: Rc<dyn Fn(A, B) -> C> = Rc::new(function);
        Self::zip_shared(self, other, &function)
    }

    fn zip_shared<B, C>(
        left: &Self,
        right: &LazyList<B>,
        function: &Rc<dyn Fn(A, B) -> C>,
    ) -> LazyList<C>
    where
        B: Clone + 'static,
        C: 'static,
    {
        let (Some(left), Some(right)) = (&left.cell, &right.cell) else {
            return LazyList::empty();
        };
        let (left_head, right_head) = (Rc::clone(left), Rc::clone(right));
        let (left_tail, right_tail) = (Rc::clone(left), Rc::clone(right));
        let combine = Rc::clone(function);
        let next = Rc::clone(function);
        LazyList::cons(
            move || combine(left_head.head().clone(), right_head.head().clone()),
            move || Self::zip_shared(&left_tail.tail(), &right_tail.tail(), &next),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{Recorder, observe};
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    #[case(vec![], false)]
    #[case(vec![1, 3], false)]
    #[case(vec![1, 4, 5], true)]
    fn test_exists(#[case] elements: Vec<i32>, #[case] expected: bool) {
        let list: LazyList<i32> = elements.into();
        assert_eq!(list.exists(|n| n % 2 == 0), expected);
    }

    #[rstest]
    #[case(vec![], true)]
    #[case(vec![2, 4], true)]
    #[case(vec![2, 3, 4], false)]
    fn test_for_all(#[case] elements: Vec<i32>, #[case] expected: bool) {
        let list: LazyList<i32> = elements.into();
        assert_eq!(list.for_all(|n| n % 2 == 0), expected);
    }

    #[rstest]
    fn test_for_all_stops_at_counterexample() {
        let list = LazyList::cons(|| 1, || panic!("tail must stay suspended"));
        assert!(!list.for_all(|n| *n > 5));
    }

    #[rstest]
    fn test_exists_forces_only_the_needed_prefix() {
        let recorder = Recorder::new();
        let list: LazyList<i32> = (1..=5).collect();
        let found = observe(recorder.clone(), || list.exists(|n| *n == 3));
        assert!(found);
        assert_eq!(recorder.heads_evaluated().len(), 3);
        assert_eq!(recorder.tails_evaluated().len(), 2);
    }

    #[rstest]
    fn test_find() {
        let list = LazyList::count_from(1_u32);
        assert_eq!(list.find(|n| n * n > 50), Some(8));
        assert_eq!(LazyList::from(vec![1, 2]).find(|n| *n > 5), None);
    }

    #[rstest]
    fn test_head_option() {
        assert_eq!(LazyList::<i32>::empty().head_option(), None);
        let list = LazyList::cons(|| 9, || panic!("tail must stay suspended"));
        assert_eq!(list.head_option(), Some(9));
    }

    #[rstest]
    fn test_take_while_stops_at_first_failure() {
        let recorder = Recorder::new();
        let list: LazyList<i32> = vec![2, 4, 6, 7, 8].into();
        let evens = observe(recorder.clone(), || list.take_while(|n| n % 2 == 0).to_vec());
        assert_eq!(evens, vec![2, 4, 6]);
        assert_eq!(recorder.heads_evaluated().len(), 4);
    }

    #[rstest]
    fn test_map_is_lazy_per_element() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let list: LazyList<i32> = vec![1, 2, 3].into();
        let doubled = list.map(move |n| {
            counter.set(counter.get() + 1);
            n * 2
        });

        assert_eq!(doubled.nth(2), Some(6));
        assert_eq!(calls.get(), 1);
        assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
        assert_eq!(calls.get(), 3);
    }

    #[rstest]
    fn test_filter_on_infinite_list() {
        let multiples = LazyList::count_from(1_u64).filter(|n| n % 7 == 0);
        assert_eq!(multiples.take(3).to_vec(), vec![7, 14, 21]);
    }

    #[rstest]
    fn test_append_does_not_call_other_early() {
        let called = Rc::new(Cell::new(false));
        let flag = Rc::clone(&called);
        let list: LazyList<i32> = vec![1, 2].into();
        let joined = list.append(move || {
            flag.set(true);
            LazyList::singleton(3)
        });

        assert_eq!(joined.take(2).to_vec(), vec![1, 2]);
        assert!(!called.get());
        assert_eq!(joined.to_vec(), vec![1, 2, 3]);
        assert!(called.get());
    }

    #[rstest]
    fn test_append_to_empty() {
        let list: LazyList<i32> = LazyList::empty();
        assert_eq!(list.append(|| LazyList::from(vec![4, 5])).to_vec(), vec![4, 5]);
    }

    #[rstest]
    fn test_flat_map() {
        let list: LazyList<i32> = vec![1, 2, 3].into();
        let repeated = list.flat_map(|n| LazyList::from(vec![n, -n]));
        assert_eq!(repeated.to_vec(), vec![1, -1, 2, -2, 3, -3]);
    }

    #[rstest]
    #[case(0, vec![])]
    #[case(1, vec![1])]
    #[case(3, vec![1, 2, 3])]
    #[case(10, vec![1, 2, 3])]
    fn test_take(#[case] count: usize, #[case] expected: Vec<i32>) {
        let list: LazyList<i32> = vec![1, 2, 3].into();
        assert_eq!(list.take(count).to_vec(), expected);
    }

    #[rstest]
    fn test_take_shares_heads_with_source() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let source = LazyList::cons(
            move || {
                counter.set(counter.get() + 1);
                1
            },
            || panic!("tail must stay suspended"),
        );
        let prefix = source.take(1);

        assert_eq!(prefix.to_vec(), vec![1]);
        assert!(source.is_head_evaluated());
        assert_eq!(source.head(), Some(1));
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    fn test_take_cells_have_their_own_ids() {
        let source = LazyList::cons(|| 1, || LazyList::cons(|| 2, LazyList::empty));
        let prefix = source.take(2);
        let recorder = Recorder::new();

        observe(recorder.clone(), || prefix.to_vec());

        let (Some(source_node), Some(prefix_node)) = (source.node_id(), prefix.node_id()) else {
            panic!("both lists are non-empty");
        };
        assert_ne!(source_node, prefix_node);
        assert_eq!(recorder.heads_evaluated().first(), Some(&source_node));
        assert!(!recorder.heads_evaluated().contains(&prefix_node));
        assert!(recorder.tails_evaluated().contains(&prefix_node));
        assert!(recorder.tails_evaluated().contains(&source_node));
    }

    #[rstest]
    fn test_drop_first_and_nth() {
        let list = LazyList::count_from(0_i32);
        assert_eq!(list.drop_first(5).head(), Some(5));
        assert_eq!(list.nth(7), Some(7));
        assert!(LazyList::from(vec![1]).drop_first(3).is_empty());
    }

    #[rstest]
    fn test_zip_ends_with_shorter() {
        let letters: LazyList<char> = "ab".chars().collect();
        let zipped = LazyList::count_from(0_u8).zip(&letters);
        assert_eq!(zipped.to_vec(), vec![(0, 'a'), (1, 'b')]);
    }
}
