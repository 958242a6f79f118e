//! Public API for the queue system
//!
//! Pipeline stages should import from here rather than from the individual
//! queue modules. See the module documentation for architecture details.

// Core queue components
pub use crate::queue::consumer::QueueConsumer;
pub use crate::queue::multi_queue::MultiQueue;
pub use crate::queue::producer::QueueProducer;

// Configuration
pub use crate::queue::config::MultiQueueConfig;

// Routing and lane strategies
pub use crate::queue::lane::{LanePolicy, LanePolicyKind};
pub use crate::queue::router::{Router, RouterKind, RoutingKey};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};

// Statistics
pub use crate::queue::types::{PartitionStats, QueueStats};
