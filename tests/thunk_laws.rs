#![cfg(feature = "control")]
//! Property-based tests for Thunk<T> and TryThunk<T, E>.
//!
//! This module verifies that:
//!
//! - **Idempotence**: force() returns the same value every time
//! - **Memoization**: the computation runs at most once
//! - **No negative caching**: a failure is retried, a success is kept

use lazylist::control::{Thunk, TryThunk};
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

proptest! {
    /// Idempotence: calling force() multiple times returns the same value
    #[test]
    fn prop_thunk_idempotence(value in any::<i64>()) {
        let thunk = Thunk::new(move || value);

        let first = *thunk.force();
        let second = *thunk.force();

        prop_assert_eq!(first, value);
        prop_assert_eq!(first, second);
    }

    /// Idempotence for heap values
    #[test]
    fn prop_thunk_idempotence_string(value in any::<String>()) {
        let thunk = Thunk::new(move || value.clone());

        let first = thunk.force().clone();
        let second = thunk.force().clone();

        prop_assert_eq!(first, second);
    }

    /// Memoization: any number of forces runs the computation once
    #[test]
    fn prop_thunk_memoization(forces in 1..20_usize) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let thunk = Thunk::new(move || {
            counter.set(counter.get() + 1);
            counter.get()
        });

        for _ in 0..forces {
            prop_assert_eq!(*thunk.force(), 1);
        }
        prop_assert_eq!(calls.get(), 1);
    }

    /// No negative caching: each failure is retried, the first success sticks
    #[test]
    fn prop_try_thunk_retries_until_success(failures in 0..10_usize, extra in 1..5_usize) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let thunk: TryThunk<usize, usize> = TryThunk::new(move || {
            counter.set(counter.get() + 1);
            if counter.get() <= failures {
                Err(counter.get())
            } else {
                Ok(counter.get())
            }
        });

        for attempt in 1..=failures {
            prop_assert_eq!(thunk.force(), Err(attempt));
        }
        for _ in 0..extra {
            prop_assert_eq!(thunk.force(), Ok(&(failures + 1)));
        }
        prop_assert_eq!(calls.get(), failures + 1);
    }
}
