//! Errors raised while forcing suspended computations.

use thiserror::Error;

use crate::trace::ThunkRole;

/// Error returned by `try_force` on the thunk types.
///
/// Failures of the wrapped computation itself are not represented here:
/// panics propagate unchanged and [`TryThunk`](super::TryThunk) returns the
/// computation's own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ThunkError {
    /// The thunk was forced again from inside its own computation.
    ///
    /// Evaluating such a thunk can never finish, so this is reported instead
    /// of recursing until the stack overflows.
    #[error("{role} was forced from inside its own computation")]
    Reentrant {
        /// The thunk that was re-entered.
        role: ThunkRole,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_reentrant_display() {
        let error = ThunkError::Reentrant {
            role: ThunkRole::Value,
        };
        assert_eq!(
            error.to_string(),
            "value was forced from inside its own computation"
        );
    }

    #[rstest]
    fn test_error_trait() {
        let error = ThunkError::Reentrant {
            role: ThunkRole::Value,
        };
        let _: &dyn std::error::Error = &error;
    }
}
