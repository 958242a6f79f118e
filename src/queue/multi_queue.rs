//! MultiQueue - partitioned, key-routed MPMC queue
//!
//! The MultiQueue owns a fixed array of partitions and, for each partition,
//! a fixed set of write lanes. Producers route every item by key to one
//! partition and write it through a lane; consumers read a single partition
//! by index, one item at a time or in batches.

use crate::queue::config::MultiQueueConfig;
use crate::queue::consumer::QueueConsumer;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::lane::{FixedLane, LanePolicy, WriteLane};
use crate::queue::partition::Partition;
use crate::queue::producer::QueueProducer;
use crate::queue::router::{Router, RoutingKey};
use crate::queue::types::QueueStats;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Bounded multi-partition queue for one homogeneous item type
///
/// # Thread Safety
///
/// Share it with `Arc<MultiQueue<T>>`. Operations on different partitions
/// never contend; operations on one partition meet on that partition's
/// guard, and producers on one lane meet on the lane's guard first.
///
/// # Example
///
/// ```rust
/// use multiqueue::queue::MultiQueue;
///
/// # fn example() -> Result<(), multiqueue::queue::QueueError> {
/// let queue = MultiQueue::init("decoder", 1024, 3, 2)?;
///
/// queue.put(7, "flow-7")?;
/// queue.puts(&[0, 1, 2], vec!["a", "b", "c"])?;
///
/// assert_eq!(queue.get(1)?, "flow-7");
/// assert_eq!(queue.gets(1, 1)?, vec!["b"]);
///
/// queue.close();
/// assert!(queue.put(0, "late").unwrap_err().is_closed());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MultiQueue<T> {
    name: Arc<str>,
    total_capacity: usize,
    partitions: Vec<Arc<Partition<T>>>,
    /// Indexed `[partition][lane]`
    lanes: Vec<Vec<WriteLane<T>>>,
    lane_count: usize,
    router: Box<dyn Router>,
    lane_policy: Box<dyn LanePolicy>,
    /// Next lane handed to a producer handle
    next_producer_lane: AtomicUsize,
    closed: AtomicBool,
}

impl<T> MultiQueue<T> {
    /// Build a queue with the default router and lane policy
    pub fn init(
        name: impl Into<String>,
        total_capacity: usize,
        partition_count: usize,
        lane_count: usize,
    ) -> QueueResult<Self> {
        Self::new(MultiQueueConfig::new(
            name,
            total_capacity,
            partition_count,
            lane_count,
        ))
    }

    /// Build a queue from configuration
    pub fn new(config: MultiQueueConfig) -> QueueResult<Self> {
        let router = config.router.build();
        let lane_policy = config.lane_policy.build();
        Self::with_strategies(config, router, lane_policy)
    }

    /// Build a queue, wrapped for sharing between producers and consumers
    pub fn shared(config: MultiQueueConfig) -> QueueResult<Arc<Self>> {
        Self::new(config).map(Arc::new)
    }

    /// Build a queue with caller-supplied routing and lane assignment
    pub fn with_strategies(
        config: MultiQueueConfig,
        router: Box<dyn Router>,
        lane_policy: Box<dyn LanePolicy>,
    ) -> QueueResult<Self> {
        config.validate()?;

        let name: Arc<str> = Arc::from(config.name.as_str());
        let partition_capacity = config.partition_capacity();

        let partitions: Vec<Arc<Partition<T>>> = (0..config.partition_count)
            .map(|index| Arc::new(Partition::new(Arc::clone(&name), index, partition_capacity)))
            .collect();

        let lanes: Vec<Vec<WriteLane<T>>> = partitions
            .iter()
            .map(|partition| {
                (0..config.lane_count)
                    .map(|_| WriteLane::new(Arc::clone(partition), config.burst_size))
                    .collect()
            })
            .collect();

        log::debug!(
            "queue '{}' initialised: {} partitions x {} lanes, {} items per partition, router {:?}, lanes {:?}",
            name,
            config.partition_count,
            config.lane_count,
            partition_capacity,
            router,
            lane_policy
        );

        Ok(Self {
            name,
            total_capacity: config.total_capacity,
            partitions,
            lanes,
            lane_count: config.lane_count,
            router,
            lane_policy,
            next_producer_lane: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn total_capacity(&self) -> usize {
        self.total_capacity
    }

    /// Capacity of each individual partition
    pub fn partition_capacity(&self) -> usize {
        self.partitions.first().map_or(1, |p| p.capacity())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Partition a key routes to
    pub fn route<K: Into<RoutingKey>>(&self, key: K) -> usize {
        self.router.route(key.into(), self.partitions.len())
    }

    fn ensure_open(&self) -> QueueResult<()> {
        if self.is_closed() {
            Err(QueueError::Closed {
                name: self.name.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn partition(&self, index: usize) -> QueueResult<&Partition<T>> {
        self.partitions
            .get(index)
            .map(|partition| &**partition)
            .ok_or(QueueError::InvalidPartition {
                index,
                partition_count: self.partitions.len(),
            })
    }

    fn lane(&self, partition: usize, lane: usize) -> &WriteLane<T> {
        &self.lanes[partition][lane % self.lane_count]
    }

    /// Route one item and make it visible to the partition's consumers
    ///
    /// Blocks while the target partition is full.
    pub fn put<K: Into<RoutingKey>>(&self, key: K, item: T) -> QueueResult<()> {
        let lane = self.lane_policy.assign(self.lane_count);
        self.put_on_lane(lane, key.into(), item)
    }

    pub(crate) fn put_on_lane(&self, lane: usize, key: RoutingKey, item: T) -> QueueResult<()> {
        self.ensure_open()?;
        let partition = self.router.route(key, self.partitions.len());
        self.lane(partition, lane).append_and_flush(item)?;
        Ok(())
    }

    /// Put `keys[i]`/`items[i]` pairs through one lane
    ///
    /// Only `min(keys.len(), items.len())` pairs are enqueued; the excess of
    /// the longer input is dropped without error. The returned count tells
    /// the caller how many items were accepted. Use [`MultiQueue::puts_exact`]
    /// to reject mismatched inputs instead.
    pub fn puts<K>(&self, keys: &[K], items: Vec<T>) -> QueueResult<usize>
    where
        K: Copy + Into<RoutingKey>,
    {
        let lane = self.lane_policy.assign(self.lane_count);
        self.puts_on_lane(lane, keys, items)
    }

    /// Like [`MultiQueue::puts`] but fails with `LengthMismatch` and enqueues
    /// nothing when the inputs differ in length
    pub fn puts_exact<K>(&self, keys: &[K], items: Vec<T>) -> QueueResult<usize>
    where
        K: Copy + Into<RoutingKey>,
    {
        if keys.len() != items.len() {
            return Err(QueueError::LengthMismatch {
                keys: keys.len(),
                items: items.len(),
            });
        }
        self.puts(keys, items)
    }

    pub(crate) fn puts_on_lane<K>(&self, lane: usize, keys: &[K], items: Vec<T>) -> QueueResult<usize>
    where
        K: Copy + Into<RoutingKey>,
    {
        self.ensure_open()?;

        if keys.len() != items.len() {
            log::warn!(
                "queue '{}': puts called with {} keys and {} items, extra {} dropped",
                self.name,
                keys.len(),
                items.len(),
                if keys.len() > items.len() { "keys" } else { "items" }
            );
        }

        // Only the lane of the current run of same-partition items may hold
        // pending items, so blocking on a full partition never strands items
        // already accepted for another one.
        let mut current: Option<usize> = None;
        let mut accepted = 0;
        for (key, item) in keys.iter().copied().zip(items) {
            let partition = self.router.route(key.into(), self.partitions.len());
            if let Some(previous) = current.filter(|&previous| previous != partition) {
                self.lane(previous, lane).flush()?;
            }
            current = Some(partition);
            self.lane(partition, lane).append(item)?;
            accepted += 1;
        }

        if let Some(last) = current {
            self.lane(last, lane).flush()?;
        }

        Ok(accepted)
    }

    /// Pop the oldest item of a partition, blocking while it is empty
    pub fn get(&self, index: usize) -> QueueResult<T> {
        self.partition(index)?.pop()
    }

    /// Pop without blocking; `Ok(None)` when the partition is empty but open
    pub fn try_get(&self, index: usize) -> QueueResult<Option<T>> {
        self.partition(index)?.try_pop()
    }

    /// Pop with a bounded wait; `Ok(None)` when the timeout elapses first
    ///
    /// Close still wakes the caller immediately.
    pub fn get_timeout(&self, index: usize, timeout: Duration) -> QueueResult<Option<T>> {
        self.partition(index)?.pop_timeout(timeout)
    }

    /// Read exactly `count` items from a partition
    ///
    /// Returns fewer only when the queue closed before enough arrived, and
    /// Closed when it closed with nothing left to read.
    pub fn gets(&self, index: usize, count: usize) -> QueueResult<Vec<T>> {
        let mut out = Vec::with_capacity(count.min(self.partition_capacity()));
        self.gets_into(index, &mut out, count)?;
        Ok(out)
    }

    /// Buffer-filling form of [`MultiQueue::gets`]; appends to `out` and
    /// returns the number of items read
    pub fn gets_into(&self, index: usize, out: &mut Vec<T>, count: usize) -> QueueResult<usize> {
        self.partition(index)?.pop_batch_into(out, count)
    }

    /// Block for at least one item, then take whatever is buffered up to `max`
    pub fn gets_available(&self, index: usize, max: usize) -> QueueResult<Vec<T>> {
        let mut out = Vec::new();
        self.partition(index)?.pop_available_into(&mut out, max)?;
        Ok(out)
    }

    /// Items currently buffered in one partition
    pub fn len(&self, index: usize) -> QueueResult<usize> {
        Ok(self.partition(index)?.len())
    }

    /// Items currently buffered across all partitions
    pub fn total_len(&self) -> usize {
        self.partitions.iter().map(|p| p.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(|p| p.is_empty())
    }

    /// Close the queue; later calls are no-ops
    ///
    /// Every blocked producer and consumer wakes. Puts fail from now on;
    /// reads drain what is buffered and then fail Closed.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        log::info!(
            "queue '{}' closing with {} items buffered",
            self.name,
            self.total_len()
        );
        for partition in &self.partitions {
            partition.drain_close();
        }
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            name: self.name.to_string(),
            partition_count: self.partitions.len(),
            lane_count: self.lane_count,
            total_capacity: self.total_capacity,
            closed: self.is_closed(),
            partitions: self.partitions.iter().map(|p| p.stats()).collect(),
        }
    }

    /// Create a producer handle pinned to its own lane
    ///
    /// Handles take lanes in turn, independent of the creating thread, so
    /// up to `lane_count` handles never share a lane. The lane policy only
    /// applies to direct `put`/`puts` calls.
    pub fn create_producer(self: &Arc<Self>, producer_id: impl Into<String>) -> QueueProducer<T> {
        let lane = self.next_producer_lane.fetch_add(1, Ordering::Relaxed) % self.lane_count;
        QueueProducer::new(producer_id.into(), lane, Arc::clone(self))
    }

    /// Create a producer handle on an explicit lane
    pub fn create_producer_on_lane(
        self: &Arc<Self>,
        producer_id: impl Into<String>,
        lane: usize,
    ) -> QueueProducer<T> {
        let lane = FixedLane(lane).assign(self.lane_count);
        QueueProducer::new(producer_id.into(), lane, Arc::clone(self))
    }

    /// Create a consumer handle owning one partition
    pub fn create_consumer(
        self: &Arc<Self>,
        consumer_id: impl Into<String>,
        partition: usize,
    ) -> QueueResult<QueueConsumer<T>> {
        self.partition(partition)?;
        Ok(QueueConsumer::new(
            consumer_id.into(),
            partition,
            Arc::clone(self),
        ))
    }
}
