//! Write lanes and lane assignment
//!
//! Each partition is fed by `lane_count` write lanes. A lane buffers a small
//! burst of items and merges it into its partition under one lock
//! acquisition, so producers on different lanes only meet on the partition
//! guard once per burst instead of once per item.
//!
//! The lane guard is held while a burst is merged. Two flushes of the same
//! lane therefore never overtake each other, which is what keeps items
//! appended through one lane in order. Items from different lanes may
//! interleave at burst granularity.

use crate::core::sync::{handle_mutex_poison, lock_ignoring_poison};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::partition::Partition;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Burst buffer bound to exactly one partition
#[derive(Debug)]
pub struct WriteLane<T> {
    partition: Arc<Partition<T>>,
    pending: Mutex<Vec<T>>,
    burst_size: usize,
}

impl<T> WriteLane<T> {
    pub fn new(partition: Arc<Partition<T>>, burst_size: usize) -> Self {
        let burst_size = burst_size.max(1);
        Self {
            partition,
            pending: Mutex::new(Vec::with_capacity(burst_size)),
            burst_size,
        }
    }

    pub fn partition_index(&self) -> usize {
        self.partition.index()
    }

    pub fn burst_size(&self) -> usize {
        self.burst_size
    }

    /// Number of items buffered but not yet merged into the partition
    pub fn pending_len(&self) -> usize {
        lock_ignoring_poison(self.pending.lock()).len()
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, Vec<T>>> {
        handle_mutex_poison(self.pending.lock(), |message| QueueError::Poisoned {
            message,
        })
    }

    /// Buffer an item, merging the burst once it reaches `burst_size`
    pub fn append(&self, item: T) -> QueueResult<()> {
        let mut pending = self.lock()?;
        pending.push(item);
        if pending.len() >= self.burst_size {
            self.flush_locked(&mut pending)?;
        }
        Ok(())
    }

    /// Buffer an item and merge everything pending before returning
    pub fn append_and_flush(&self, item: T) -> QueueResult<usize> {
        let mut pending = self.lock()?;
        pending.push(item);
        self.flush_locked(&mut pending)
    }

    /// Merge all pending items into the partition
    pub fn flush(&self) -> QueueResult<usize> {
        let mut pending = self.lock()?;
        self.flush_locked(&mut pending)
    }

    fn flush_locked(&self, pending: &mut Vec<T>) -> QueueResult<usize> {
        if pending.is_empty() {
            return Ok(0);
        }
        let burst = mem::replace(pending, Vec::with_capacity(self.burst_size));
        let count = burst.len();
        log::trace!(
            "flushing {} items into partition {}",
            count,
            self.partition.index()
        );
        self.partition.push_all(burst)
    }
}

/// Strategy choosing the lane for direct `put`/`puts` calls
///
/// The result is reduced modulo `lane_count` by the queue, so policies may
/// return any value. A lane shared by several producers stays correct since
/// its guard serialises them; policies only decide how much they contend.
pub trait LanePolicy: Send + Sync + fmt::Debug {
    fn assign(&self, lane_count: usize) -> usize;
}

/// Hands out lanes in turn
#[derive(Debug, Default)]
pub struct RoundRobinLanes {
    next: AtomicUsize,
}

impl LanePolicy for RoundRobinLanes {
    fn assign(&self, lane_count: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % lane_count.max(1)
    }
}

/// Pins each thread to one lane by hashing its thread id
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadAffineLanes;

impl LanePolicy for ThreadAffineLanes {
    fn assign(&self, lane_count: usize) -> usize {
        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        (hasher.finish() % lane_count.max(1) as u64) as usize
    }
}

/// Always the same caller-supplied lane
#[derive(Debug, Clone, Copy)]
pub struct FixedLane(pub usize);

impl LanePolicy for FixedLane {
    fn assign(&self, lane_count: usize) -> usize {
        self.0 % lane_count.max(1)
    }
}

/// Lane policy selection as it appears in configuration files
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum LanePolicyKind {
    RoundRobin,
    #[default]
    ThreadAffine,
}

impl LanePolicyKind {
    pub fn build(self) -> Box<dyn LanePolicy> {
        match self {
            LanePolicyKind::RoundRobin => Box::new(RoundRobinLanes::default()),
            LanePolicyKind::ThreadAffine => Box::new(ThreadAffineLanes),
        }
    }
}
