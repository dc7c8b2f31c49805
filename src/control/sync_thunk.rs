//! Thread-safe memoized suspended computations.
//!
//! [`SyncThunk<T>`] is the shareable counterpart of
//! [`Thunk`](super::Thunk). Any number of threads may force it; exactly one
//! of them runs the computation while the others block, and every caller
//! observes the same cached value.
//!
//! # Failure policy
//!
//! Same as `Thunk`: a panicking computation is not cached. The panic reaches
//! the forcing thread, the computation is put back, and the next forcer
//! (on any thread) retries.
//!
//! # Examples
//!
//! ```rust
//! use lazylist::control::SyncThunk;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let thunk = Arc::new(SyncThunk::new(|| {
//!     println!("Computing...");
//!     42
//! }));
//!
//! let handles: Vec<_> = (0..10)
//!     .map(|_| {
//!         let thunk = Arc::clone(&thunk);
//!         thread::spawn(move || *thunk.force())
//!     })
//!     .collect();
//!
//! // All threads get the same value, and the computation ran only once
//! for handle in handles {
//!     assert_eq!(handle.join().unwrap(), 42);
//! }
//! ```

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::ReentrantMutex;

use super::ThunkError;
use crate::trace::{self, ForceEvent, ThunkRole};

type SharedCompute<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Puts the computation back into its slot if evaluation unwinds.
struct Restore<'a, T> {
    slot: &'a Cell<Option<SharedCompute<T>>>,
    compute: Option<SharedCompute<T>>,
}

impl<T> Restore<'_, T> {
    fn disarm(mut self) {
        self.compute = None;
    }
}

impl<T> Drop for Restore<'_, T> {
    fn drop(&mut self) {
        if let Some(compute) = self.compute.take() {
            self.slot.set(Some(compute));
            tracing::debug!("shared computation unwound; thunk left unevaluated");
            trace::emit(ForceEvent::Failed {
                role: ThunkRole::Value,
            });
        }
    }
}

/// A thread-safe suspended computation that is evaluated at most once.
///
/// The Unevaluated to Evaluated transition happens under a
/// [`parking_lot::ReentrantMutex`]; reading an evaluated value takes no lock.
///
/// # Thread Safety
///
/// `SyncThunk<T>` is `Send` when `T: Send` and `Sync` when `T: Send + Sync`.
pub struct SyncThunk<T> {
    value: OnceLock<T>,
    compute: ReentrantMutex<Cell<Option<SharedCompute<T>>>>,
}

impl<T> SyncThunk<T> {
    /// Creates a thunk that will run `compute` when first forced.
    #[inline]
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            value: OnceLock::new(),
            compute: ReentrantMutex::new(Cell::new(Some(Arc::new(compute)))),
        }
    }

    /// Creates a thunk that is already evaluated.
    #[inline]
    pub fn evaluated(value: T) -> Self {
        Self {
            value: OnceLock::from(value),
            compute: ReentrantMutex::new(Cell::new(None)),
        }
    }

    /// Forces the computation and returns a reference to its result.
    ///
    /// Concurrent callers block until the winning thread has stored the
    /// value.
    ///
    /// # Panics
    ///
    /// - If the computation panics; the thunk stays unevaluated.
    /// - If the thunk is forced from inside its own computation.
    pub fn force(&self) -> &T {
        match self.try_force() {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Like [`force`](Self::force), but reports re-entrancy as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ThunkError::Reentrant`] when called from inside this
    /// thunk's own computation on the same thread.
    pub fn try_force(&self) -> Result<&T, ThunkError> {
        if let Some(value) = self.value.get() {
            trace::emit(ForceEvent::Cached {
                role: ThunkRole::Value,
            });
            return Ok(value);
        }

        let slot = self.compute.lock();
        // Another thread may have finished while this one was waiting.
        if let Some(value) = self.value.get() {
            trace::emit(ForceEvent::Cached {
                role: ThunkRole::Value,
            });
            return Ok(value);
        }

        // The slot is empty only while this very thread is evaluating.
        let Some(compute) = slot.take() else {
            return Err(ThunkError::Reentrant {
                role: ThunkRole::Value,
            });
        };
        let restore = Restore {
            slot: &*slot,
            compute: Some(Arc::clone(&compute)),
        };
        let value = compute();
        let value = self.value.get_or_init(move || value);
        restore.disarm();

        tracing::trace!("shared thunk evaluated");
        trace::emit(ForceEvent::Evaluated {
            role: ThunkRole::Value,
        });
        Ok(value)
    }

    /// Returns the cached value without forcing.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns whether the value has been computed.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncThunk<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => formatter.debug_tuple("SyncThunk").field(value).finish(),
            None => formatter
                .debug_tuple("SyncThunk")
                .field(&"<unevaluated>")
                .finish(),
        }
    }
}

static_assertions::assert_impl_all!(SyncThunk<i32>: Send, Sync);
static_assertions::assert_impl_all!(SyncThunk<String>: Send, Sync);
static_assertions::assert_not_impl_any!(SyncThunk<std::rc::Rc<i32>>: Send, Sync);
