//! Queue Producer for routing items into partitions
//!
//! A producer handle is pinned to one write lane for its whole life, so
//! everything it puts reaches each partition in the order it was put.

use crate::queue::error::QueueResult;
use crate::queue::multi_queue::MultiQueue;
use crate::queue::router::RoutingKey;
use std::sync::Arc;

/// Producer handle bound to one write lane
///
/// Handles are cheap; create one per producer thread. Two handles on the
/// same lane are still correct but contend on that lane.
///
/// # Example
///
/// ```rust
/// use multiqueue::queue::{MultiQueue, MultiQueueConfig};
///
/// # fn example() -> Result<(), multiqueue::queue::QueueError> {
/// let queue = MultiQueue::shared(MultiQueueConfig::new("decoder", 64, 2, 4))?;
/// let producer = queue.create_producer("decoder-0");
///
/// producer.put(42u64, "record")?;
/// let accepted = producer.puts(&[1u64, 2], vec!["a", "b"])?;
/// assert_eq!(accepted, 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QueueProducer<T> {
    producer_id: String,
    lane: usize,
    queue: Arc<MultiQueue<T>>,
}

impl<T> QueueProducer<T> {
    pub(crate) fn new(producer_id: String, lane: usize, queue: Arc<MultiQueue<T>>) -> Self {
        log::debug!(
            "producer '{}' writing to queue '{}' through lane {}",
            producer_id,
            queue.name(),
            lane
        );
        Self {
            producer_id,
            lane,
            queue,
        }
    }

    pub fn producer_id(&self) -> &str {
        &self.producer_id
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn queue(&self) -> &Arc<MultiQueue<T>> {
        &self.queue
    }

    /// Route one item through this producer's lane
    pub fn put<K: Into<RoutingKey>>(&self, key: K, item: T) -> QueueResult<()> {
        self.queue.put_on_lane(self.lane, key.into(), item)
    }

    /// Pairwise put, truncated to the shorter input; returns the accepted count
    pub fn puts<K>(&self, keys: &[K], items: Vec<T>) -> QueueResult<usize>
    where
        K: Copy + Into<RoutingKey>,
    {
        self.queue.puts_on_lane(self.lane, keys, items)
    }

    /// Pairwise put that rejects mismatched lengths
    pub fn puts_exact<K>(&self, keys: &[K], items: Vec<T>) -> QueueResult<usize>
    where
        K: Copy + Into<RoutingKey>,
    {
        if keys.len() != items.len() {
            return Err(crate::queue::QueueError::LengthMismatch {
                keys: keys.len(),
                items: items.len(),
            });
        }
        self.puts(keys, items)
    }
}

impl<T> Clone for QueueProducer<T> {
    fn clone(&self) -> Self {
        Self {
            producer_id: self.producer_id.clone(),
            lane: self.lane,
            queue: Arc::clone(&self.queue),
        }
    }
}
