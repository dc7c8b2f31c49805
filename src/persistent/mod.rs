//! Persistent (immutable) lists.
//!
//! This module provides two list types that use structural sharing, so
//! prepending or taking a tail never copies existing cells:
//!
//! - [`LazyList`]: a lazily evaluated, memoized, possibly infinite list
//! - [`PersistentList`]: a strict list, the result of forcing a finite
//!   [`LazyList`] with [`LazyList::to_list`]
//!
//! # Examples
//!
//! ```rust
//! use lazylist::persistent::{LazyList, PersistentList};
//!
//! let naturals = LazyList::count_from(1_u32);
//! let prefix: PersistentList<u32> = naturals.take_while(|n| *n <= 3).to_list();
//!
//! assert_eq!(prefix, PersistentList::new().cons(3).cons(2).cons(1));
//! ```

mod lazy_list;
mod list;

pub use lazy_list::{Iter, Knot, LazyList, Rest};
pub use list::{PersistentList, PersistentListIterator};
