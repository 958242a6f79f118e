//! Queue Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid queue configuration: {message}")]
    Config { message: String },

    #[error("Invalid partition index {index} (partition count: {partition_count})")]
    InvalidPartition {
        index: usize,
        partition_count: usize,
    },

    #[error("Queue '{name}' is closed")]
    Closed { name: String },

    #[error("Mismatched batch lengths: {keys} keys for {items} items")]
    LengthMismatch { keys: usize, items: usize },

    #[error("Queue synchronisation failed: {message}")]
    Poisoned { message: String },
}

impl QueueError {
    pub fn config(message: impl Into<String>) -> Self {
        QueueError::Config {
            message: message.into(),
        }
    }

    /// Closed is the normal termination signal during shutdown, not a failure
    pub fn is_closed(&self) -> bool {
        matches!(self, QueueError::Closed { .. })
    }
}

impl crate::core::error_handling::ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            QueueError::Config { .. } | QueueError::LengthMismatch { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::Config { message } => Some(message),
            QueueError::LengthMismatch { .. } => {
                Some("Routing keys and items must be supplied in equal numbers")
            }
            _ => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
