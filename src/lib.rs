//! # lazylist
//!
//! Lazily evaluated persistent lists with memoized suspensions.
//!
//! ## Overview
//!
//! - **Suspensions**: [`Thunk`](control::Thunk) runs a computation at most
//!   once and caches the result. Failures are never cached.
//! - **Lazy lists**: [`LazyList`](persistent::LazyList) suspends both the
//!   head and the tail of every cell, so infinite lists are ordinary values.
//! - **Lazy right fold**: every query and transformation is built on a
//!   right fold whose continuation is itself suspended.
//! - **Tracing**: every force is reported to the observers installed with
//!   [`trace::observe`], which is enough to replay an evaluation step by step.
//!
//! ## Feature Flags
//!
//! - `control`: thunks and evaluation tracing
//! - `persistent`: lazy and strict lists (requires `control`)
//! - `concurrent`: [`SyncThunk`](control::SyncThunk), a thread-safe thunk
//! - `serde`: serialization of strict lists and trace events
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use lazylist::prelude::*;
//!
//! let fizz = LazyList::count_from(1_u32).filter(|n| n % 3 == 0);
//! assert_eq!(fizz.take(3).to_list().to_vec(), vec![3, 6, 9]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use lazylist::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "control")]
pub mod trace;

#[cfg(feature = "persistent")]
pub mod persistent;
