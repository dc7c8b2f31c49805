//! Suspended computations with memoization.
//!
//! This module provides the building blocks of lazy evaluation:
//!
//! - [`Thunk`]: a computation evaluated at most once, cached afterwards
//! - [`TryThunk`]: a fallible computation whose errors are never cached
//! - [`SyncThunk`]: a thread-safe [`Thunk`] (feature `concurrent`)
//!
//! All of them share one failure policy: a computation that fails leaves
//! its thunk unevaluated, so the next force tries again.
//!
//! # Examples
//!
//! ```rust
//! use lazylist::control::Thunk;
//!
//! let thunk = Thunk::new(|| {
//!     println!("Computing...");
//!     42
//! });
//! // "Computing..." is not printed yet
//!
//! let value = thunk.force();
//! // Now "Computing..." is printed and value is 42
//! assert_eq!(*value, 42);
//! ```

mod error;
#[cfg(feature = "concurrent")]
mod sync_thunk;
mod thunk;
mod try_thunk;

pub use error::ThunkError;
#[cfg(feature = "concurrent")]
pub use sync_thunk::SyncThunk;
pub use thunk::Thunk;
pub use try_thunk::TryThunk;
