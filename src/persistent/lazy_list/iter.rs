use std::iter::FusedIterator;

use super::LazyList;

/// An iterator that forces a [`LazyList`] one cell at a time.
///
/// Each call to `next` forces one head and one tail, memoizing both in the
/// list being iterated. Works on infinite lists as long as the caller stops.
pub struct Iter<A> {
    current: LazyList<A>,
}

impl<A> LazyList<A> {
    /// Returns an iterator over clones of the elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::LazyList;
    ///
    /// let squares: Vec<u32> = LazyList::count_from(1_u32)
    ///     .iter()
    ///     .map(|n| n * n)
    ///     .take(4)
    ///     .collect();
    /// assert_eq!(squares, vec![1, 4, 9, 16]);
    /// ```
    pub fn iter(&self) -> Iter<A> {
        Iter {
            current: self.clone(),
        }
    }
}

impl<A: Clone> Iterator for Iter<A> {
    type Item = A;

    fn next(&mut self) -> Option<Self::Item> {
        let (head, rest) = self.current.uncons()?;
        self.current = rest;
        Some(head)
    }
}

impl<A: Clone> FusedIterator for Iter<A> {}

impl<A: Clone> IntoIterator for &LazyList<A> {
    type Item = A;
    type IntoIter = Iter<A>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<A: Clone> IntoIterator for LazyList<A> {
    type Item = A;
    type IntoIter = Iter<A>;

    fn into_iter(self) -> Self::IntoIter {
        Iter { current: self }
    }
}
