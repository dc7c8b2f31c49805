//! Memoized suspended computations.
//!
//! This module provides [`Thunk<T>`], a zero-argument computation that runs
//! at most once. The first [`force`](Thunk::force) evaluates it and caches
//! the result; every later force returns the cached value.
//!
//! # Failure policy
//!
//! A failed evaluation is never cached. If the computation panics, the panic
//! reaches the caller of `force` and the thunk goes back to its unevaluated
//! state with its computation intact, so the next `force` tries again.
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
//!
//! // No output yet - computation is deferred
//! assert!(!thunk.is_evaluated());
//!
//! // Now "Computing..." is printed
//! assert_eq!(*thunk.force(), 42);
//!
//! // No recomputation - result is memoized
//! assert_eq!(*thunk.force(), 42);
//! ```

use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::ThunkError;
use crate::trace::{self, ForceEvent, ThunkRole};

/// Marks a thunk as running for the duration of one evaluation.
///
/// Clears the mark when dropped. If that happens before [`complete`] (the
/// computation unwound), a `Failed` event is reported.
///
/// [`complete`]: Evaluation::complete
pub(super) struct Evaluation<'a> {
    running: &'a Cell<bool>,
    role: ThunkRole,
    completed: bool,
}

impl<'a> Evaluation<'a> {
    pub(super) fn enter(running: &'a Cell<bool>, role: ThunkRole) -> Result<Self, ThunkError> {
        if running.replace(true) {
            return Err(ThunkError::Reentrant { role });
        }
        Ok(Self {
            running,
            role,
            completed: false,
        })
    }

    pub(super) fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for Evaluation<'_> {
    fn drop(&mut self) {
        self.running.set(false);
        if !self.completed {
            tracing::debug!(role = %self.role, "computation unwound; thunk left unevaluated");
            trace::emit(ForceEvent::Failed { role: self.role });
        }
    }
}

/// A suspended computation that is evaluated at most once.
///
/// `Thunk<T>` holds a computation of type `Fn() -> T`. Nothing runs until
/// [`force`](Self::force) is called; the result is then cached and the
/// computation itself is released.
///
/// # Thread Safety
///
/// This type is NOT thread-safe. Use
/// [`SyncThunk`](super::SyncThunk) when a suspension is shared between threads.
///
/// # Examples
///
/// ## Memoization
///
/// ```rust
/// use lazylist::control::Thunk;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let call_count = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&call_count);
/// let thunk = Thunk::new(move || {
///     counter.set(counter.get() + 1);
///     42
/// });
///
/// assert_eq!(call_count.get(), 0); // Not called yet
///
/// let _ = thunk.force();
/// assert_eq!(call_count.get(), 1); // Called once
///
/// let _ = thunk.force();
/// assert_eq!(call_count.get(), 1); // Still only once - memoized
/// ```
///
/// ## Retry after failure
///
/// ```rust
/// use lazylist::control::Thunk;
/// use std::cell::Cell;
/// use std::panic::{AssertUnwindSafe, catch_unwind};
/// use std::rc::Rc;
///
/// let attempts = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&attempts);
/// let thunk = Thunk::new(move || {
///     counter.set(counter.get() + 1);
///     assert!(counter.get() > 1, "first attempt fails");
///     "ready"
/// });
///
/// assert!(catch_unwind(AssertUnwindSafe(|| *thunk.force())).is_err());
/// assert!(!thunk.is_evaluated());
///
/// assert_eq!(*thunk.force(), "ready");
/// assert_eq!(attempts.get(), 2);
/// ```
pub struct Thunk<T> {
    value: OnceCell<T>,
    compute: RefCell<Option<Rc<dyn Fn() -> T>>>,
    running: Cell<bool>,
    role: ThunkRole,
}

impl<T> Thunk<T> {
    /// Creates a thunk that will run `compute` when first forced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::control::Thunk;
    ///
    /// let thunk = Thunk::new(|| "hello".len());
    /// assert_eq!(*thunk.force(), 5);
    /// ```
    #[inline]
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self::with_role(ThunkRole::Value, compute)
    }

    /// Creates a thunk whose force events are reported under `role`.
    #[inline]
    pub fn with_role<F>(role: ThunkRole, compute: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self {
            value: OnceCell::new(),
            compute: RefCell::new(Some(Rc::new(compute))),
            running: Cell::new(false),
            role,
        }
    }

    /// Creates a thunk that is already evaluated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::control::Thunk;
    ///
    /// let thunk = Thunk::evaluated(42);
    /// assert!(thunk.is_evaluated());
    /// ```
    #[inline]
    pub fn evaluated(value: T) -> Self {
        Self::evaluated_with_role(ThunkRole::Value, value)
    }

    pub(crate) fn evaluated_with_role(role: ThunkRole, value: T) -> Self {
        Self {
            value: OnceCell::from(value),
            compute: RefCell::new(None),
            running: Cell::new(false),
            role,
        }
    }

    /// Forces the computation and returns a reference to its result.
    ///
    /// # Panics
    ///
    /// - If the computation panics. The thunk stays unevaluated and the next
    ///   call runs the computation again.
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
    /// thunk's own computation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::control::Thunk;
    ///
    /// let thunk = Thunk::new(|| 42);
    /// assert_eq!(thunk.try_force().copied(), Ok(42));
    /// ```
    pub fn try_force(&self) -> Result<&T, ThunkError> {
        if let Some(value) = self.value.get() {
            trace::emit(ForceEvent::Cached { role: self.role });
            return Ok(value);
        }

        let evaluation = Evaluation::enter(&self.running, self.role)?;
        // The computation is cloned out so that no borrow is held while it
        // runs; it may force other thunks.
        let Some(compute) = self.compute.borrow().clone() else {
            unreachable!("unevaluated thunk without a computation")
        };
        let value = compute();
        evaluation.complete();

        // Stored before any observer runs.
        let value = self.value.get_or_init(move || value);
        self.compute.borrow_mut().take();
        tracing::trace!(role = %self.role, "thunk evaluated");
        trace::emit(ForceEvent::Evaluated { role: self.role });
        Ok(value)
    }

    /// Returns the cached value without forcing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazylist::control::Thunk;
    ///
    /// let thunk = Thunk::new(|| 42);
    /// assert!(thunk.get().is_none());
    /// thunk.force();
    /// assert_eq!(thunk.get(), Some(&42));
    /// ```
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns whether the value has been computed.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns the role under which this thunk reports force events.
    #[inline]
    pub const fn role(&self) -> ThunkRole {
        self.role
    }

    /// Moves the cached value out, leaving the thunk unusable.
    ///
    /// Only used while tearing a list down.
    pub(crate) fn take_value(&mut self) -> Option<T> {
        self.value.take()
    }
}

impl<T: fmt::Debug> fmt::Debug for Thunk<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => formatter.debug_tuple("Thunk").field(value).finish(),
            None if self.running.get() => {
                formatter.debug_tuple("Thunk").field(&"<running>").finish()
            }
            None => formatter.debug_tuple("Thunk").field(&"<unevaluated>").finish(),
        }
    }
}
