//! Error reporting helpers
//!
//! Distinguishes errors an operator can fix (bad configuration, bad
//! arguments) from internal failures, so the binary can print the former
//! verbatim and keep the latter at debug detail.

/// Errors that know whether their message is fit for the operator
///
/// When `is_user_actionable()` is true, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// True when the message names something the operator can change
    fn is_user_actionable(&self) -> bool;

    /// The operator-facing message for user-actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error with the detail level its kind deserves
///
/// User-actionable errors log their own message; anything else logs the
/// operation that failed, with the full error at debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("FATAL: {}", user_msg),
        None => log::error!("FATAL: {} failed", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Process exit code for an error: 2 for operator mistakes, 1 otherwise
pub fn exit_code<E: ContextualError>(error: &E) -> i32 {
    if error.is_user_actionable() {
        2
    } else {
        1
    }
}
