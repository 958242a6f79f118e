//! Type definitions for the queue system
//!
//! Snapshot statistics reported by partitions and the queue as a whole.

use serde::Serialize;

/// Point-in-time counters for one partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    /// Partition index
    pub index: usize,
    /// Items currently buffered
    pub len: usize,
    /// Maximum items the partition holds before producers block
    pub capacity: usize,
    /// Items ever appended
    pub pushed: u64,
    /// Items ever handed to consumers
    pub popped: u64,
    /// Whether the partition has been closed
    pub closed: bool,
}

/// Point-in-time statistics for a whole MultiQueue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub name: String,
    pub partition_count: usize,
    pub lane_count: usize,
    pub total_capacity: usize,
    pub closed: bool,
    pub partitions: Vec<PartitionStats>,
}

impl QueueStats {
    pub fn total_len(&self) -> usize {
        self.partitions.iter().map(|p| p.len).sum()
    }

    pub fn total_pushed(&self) -> u64 {
        self.partitions.iter().map(|p| p.pushed).sum()
    }

    pub fn total_popped(&self) -> u64 {
        self.partitions.iter().map(|p| p.popped).sum()
    }
}
