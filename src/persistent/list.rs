//! Persistent (immutable) strict singly-linked list.
//!
//! [`PersistentList`] is the fully materialized counterpart of
//! [`LazyList`](super::LazyList): every element is already computed and the
//! length is known. [`LazyList::to_list`](super::LazyList::to_list) produces
//! one by prepending each forced element and reversing once at the end, which
//! is why `cons` and `reverse` are the two operations this type is built
//! around.
//!
//! # Examples
//!
//! ```rust
//! use lazylist::persistent::PersistentList;
//!
//! let list = PersistentList::new().cons(3).cons(2).cons(1);
//! assert_eq!(list.head(), Some(&1));
//! assert_eq!(list.len(), 3);
//!
//! // Structural sharing: the original list is preserved
//! let extended = list.cons(0);
//! assert_eq!(list.len(), 3);
//! assert_eq!(extended.len(), 4);
//! ```

use std::fmt;
use std::iter::FromIterator;
use std::rc::Rc;

struct Node<T> {
    element: T,
    next: Option<Rc<Self>>,
}

/// A persistent, strict, singly-linked list.
///
/// # Time Complexity
///
/// | Operation | Complexity |
/// |-----------|------------|
/// | `cons`    | O(1)       |
/// | `head`    | O(1)       |
/// | `tail`    | O(1)       |
/// | `len`     | O(1)       |
/// | `reverse` | O(n)       |
pub struct PersistentList<T> {
    head: Option<Rc<Node<T>>>,
    length: usize,
}

impl<T> PersistentList<T> {
    /// Creates a new empty list.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: None,
            length: 0,
        }
    }

    /// Creates a list containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().cons(element)
    }

    /// Prepends an element, sharing the whole of `self` as the tail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::PersistentList;
    ///
    /// let list = PersistentList::new().cons(2).cons(1);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    /// ```
    #[must_use]
    pub fn cons(&self, element: T) -> Self {
        Self {
            head: Some(Rc::new(Node {
                element,
                next: self.head.clone(),
            })),
            length: self.length + 1,
        }
    }

    /// Returns the first element.
    #[inline]
    pub fn head(&self) -> Option<&T> {
        self.head.as_ref().map(|node| &node.element)
    }

    /// Returns everything after the first element; empty for an empty list.
    #[must_use]
    pub fn tail(&self) -> Self {
        self.head.as_ref().map_or_else(Self::new, |node| Self {
            head: node.next.clone(),
            length: self.length - 1,
        })
    }

    /// Splits the list into its first element and the rest.
    pub fn uncons(&self) -> Option<(&T, Self)> {
        self.head.as_ref().map(|node| {
            (
                &node.element,
                Self {
                    head: node.next.clone(),
                    length: self.length - 1,
                },
            )
        })
    }

    /// Returns the number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns whether the list has no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns an iterator over references to the elements, front to back.
    pub fn iter(&self) -> PersistentListIterator<'_, T> {
        PersistentListIterator {
            current: self.head.as_deref(),
            remaining: self.length,
        }
    }

    /// Folds the elements front to back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=4).collect();
    /// assert_eq!(list.fold_left(0, |sum, element| sum + element), 10);
    /// ```
    pub fn fold_left<B, F>(&self, init: B, function: F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        self.iter().fold(init, function)
    }
}

impl<T: Clone> PersistentList<T> {
    /// Returns the elements in reverse order.
    ///
    /// A strict left fold that prepends every element onto an empty list.
    #[must_use]
    pub fn reverse(&self) -> Self {
        self.fold_left(Self::new(), |reversed, element| {
            reversed.cons(element.clone())
        })
    }

    /// Copies the elements into a `Vec`, front to back.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Clone for PersistentList<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            length: self.length,
        }
    }
}

// Dropping node by node keeps the stack flat no matter how long the list is.
impl<T> Drop for PersistentList<T> {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            next = Rc::try_unwrap(node)
                .ok()
                .and_then(|mut node| node.next.take());
        }
    }
}

/// An iterator over references to elements of a [`PersistentList`].
pub struct PersistentListIterator<'a, T> {
    current: Option<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for PersistentListIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|node| {
            self.current = node.next.as_deref();
            self.remaining -= 1;
            &node.element
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PersistentListIterator<'_, T> {}

impl<'a, T> IntoIterator for &'a PersistentList<T> {
    type Item = &'a T;
    type IntoIter = PersistentListIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for PersistentList<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for PersistentList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut elements: Vec<T> = iter.into_iter().collect();
        let mut list = Self::new();
        while let Some(element) = elements.pop() {
            list = list.cons(element);
        }
        list
    }
}

impl<T: PartialEq> PartialEq for PersistentList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PersistentList<T> {}

impl<T: fmt::Debug> fmt::Debug for PersistentList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for PersistentList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let elements = Vec::<T>::deserialize(deserializer)?;
        Ok(elements.into_iter().collect())
    }
}
