//! Memoized computations that may fail.
//!
//! [`TryThunk<T, E>`] caches a successful result exactly like
//! [`Thunk`](super::Thunk), but an `Err` is handed back to the caller and
//! forgotten. The next force runs the computation again, so transient
//! failures are never cached.

use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::thunk::Evaluation;
use crate::trace::{self, ForceEvent, ThunkRole};

/// A suspended fallible computation whose successful result is memoized.
///
/// # Examples
///
/// ```rust
/// use lazylist::control::TryThunk;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let attempts = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&attempts);
/// let config = TryThunk::new(move || {
///     counter.set(counter.get() + 1);
///     if counter.get() < 2 {
///         Err("not mounted yet")
///     } else {
///         Ok(8080_u16)
///     }
/// });
///
/// assert_eq!(config.force(), Err("not mounted yet"));
/// assert_eq!(config.force(), Ok(&8080));
/// assert_eq!(config.force(), Ok(&8080));
/// assert_eq!(attempts.get(), 2);
/// ```
pub struct TryThunk<T, E> {
    value: OnceCell<T>,
    compute: RefCell<Option<Rc<dyn Fn() -> Result<T, E>>>>,
    running: Cell<bool>,
}

impl<T, E> TryThunk<T, E> {
    /// Creates a thunk that will run `compute` when first forced.
    #[inline]
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> Result<T, E> + 'static,
    {
        Self {
            value: OnceCell::new(),
            compute: RefCell::new(Some(Rc::new(compute))),
            running: Cell::new(false),
        }
    }

    /// Forces the computation.
    ///
    /// # Errors
    ///
    /// Returns the computation's error. The error is not cached; the thunk
    /// stays unevaluated and the next call retries.
    ///
    /// # Panics
    ///
    /// If the thunk is forced from inside its own computation, or if the
    /// computation panics (which also leaves the thunk unevaluated).
    pub fn force(&self) -> Result<&T, E> {
        if let Some(value) = self.value.get() {
            trace::emit(ForceEvent::Cached {
                role: ThunkRole::Value,
            });
            return Ok(value);
        }

        let evaluation = match Evaluation::enter(&self.running, ThunkRole::Value) {
            Ok(evaluation) => evaluation,
            Err(error) => panic!("{error}"),
        };
        let Some(compute) = self.compute.borrow().clone() else {
            unreachable!("unevaluated thunk without a computation")
        };
        let outcome = compute();
        evaluation.complete();

        match outcome {
            Ok(value) => {
                let value = self.value.get_or_init(move || value);
                self.compute.borrow_mut().take();
                trace::emit(ForceEvent::Evaluated {
                    role: ThunkRole::Value,
                });
                Ok(value)
            }
            Err(error) => {
                tracing::debug!("fallible thunk failed; will retry on next force");
                trace::emit(ForceEvent::Failed {
                    role: ThunkRole::Value,
                });
                Err(error)
            }
        }
    }

    /// Returns the cached value without forcing.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns whether a successful result has been cached.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: fmt::Debug, E> fmt::Debug for TryThunk<T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => formatter.debug_tuple("TryThunk").field(value).finish(),
            None => formatter
                .debug_tuple("TryThunk")
                .field(&"<unevaluated>")
                .finish(),
        }
    }
}
