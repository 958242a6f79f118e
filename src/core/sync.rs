//! Synchronization utilities for robust mutex handling
//!
//! Lock and condition-variable results are converted into application errors
//! here so queue code never unwraps a poisoned guard.

use std::sync::{LockResult, MutexGuard, PoisonError};

/// Handle poisoned mutex cases with consistent error handling
///
/// Converts a poison error into an application-specific error using the
/// provided constructor. Works for `Mutex::lock` as well as `Condvar::wait`,
/// both of which hand back a `LockResult`.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use multiqueue::core::sync::handle_mutex_poison;
/// use multiqueue::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| QueueError::Poisoned { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(
            format!(
                "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
                poison_err
            )
        )
    })
}

/// Take the guard even if a previous holder panicked
///
/// Only for state transitions that must always complete, such as closing.
pub fn lock_ignoring_poison<T>(result: LockResult<MutexGuard<'_, T>>) -> MutexGuard<'_, T> {
    result.unwrap_or_else(PoisonError::into_inner)
}
