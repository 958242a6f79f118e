//! Queue Consumer owning one partition
//!
//! Pipeline writers run one consumer per partition so that pops on a
//! partition never compete with each other.

use crate::queue::error::QueueResult;
use crate::queue::multi_queue::MultiQueue;
use std::sync::Arc;
use std::time::Duration;

/// Consumer handle reading a single partition
///
/// # Example
///
/// ```rust,no_run
/// # use multiqueue::queue::MultiQueue;
/// # use std::sync::Arc;
/// # fn example(queue: Arc<MultiQueue<String>>) -> Result<(), multiqueue::queue::QueueError> {
/// let consumer = queue.create_consumer("writer-0", 0)?;
///
/// let mut batch = Vec::with_capacity(512);
/// loop {
///     batch.clear();
///     match consumer.read_batch_into(&mut batch, 512) {
///         Ok(_) => println!("writing {} rows", batch.len()),
///         Err(e) if e.is_closed() => break,
///         Err(e) => return Err(e),
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QueueConsumer<T> {
    consumer_id: String,
    partition: usize,
    queue: Arc<MultiQueue<T>>,
}

impl<T> QueueConsumer<T> {
    pub(crate) fn new(consumer_id: String, partition: usize, queue: Arc<MultiQueue<T>>) -> Self {
        log::debug!(
            "consumer '{}' reading partition {} of queue '{}'",
            consumer_id,
            partition,
            queue.name()
        );
        Self {
            consumer_id,
            partition,
            queue,
        }
    }

    pub fn consumer_id(&self) -> &str {
        &self.consumer_id
    }

    pub fn partition(&self) -> usize {
        self.partition
    }

    /// Blocking read of the next item
    pub fn read(&self) -> QueueResult<T> {
        self.queue.get(self.partition)
    }

    pub fn try_read(&self) -> QueueResult<Option<T>> {
        self.queue.try_get(self.partition)
    }

    pub fn read_timeout(&self, timeout: Duration) -> QueueResult<Option<T>> {
        self.queue.get_timeout(self.partition, timeout)
    }

    /// Read exactly `batch_size` items unless the queue closes first
    pub fn read_batch(&self, batch_size: usize) -> QueueResult<Vec<T>> {
        self.queue.gets(self.partition, batch_size)
    }

    pub fn read_batch_into(&self, out: &mut Vec<T>, batch_size: usize) -> QueueResult<usize> {
        self.queue.gets_into(self.partition, out, batch_size)
    }

    /// Read whatever is buffered, up to `max`, waiting for at least one item
    pub fn read_available(&self, max: usize) -> QueueResult<Vec<T>> {
        self.queue.gets_available(self.partition, max)
    }

    /// Items waiting in this consumer's partition
    pub fn lag(&self) -> usize {
        self.queue.len(self.partition).unwrap_or(0)
    }

    /// Iterate items until the queue is closed and drained
    ///
    /// Errors other than Closed also end the iteration; they are logged.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        std::iter::from_fn(move || match self.read() {
            Ok(item) => Some(item),
            Err(e) if e.is_closed() => None,
            Err(e) => {
                log::error!("consumer '{}' stopped: {}", self.consumer_id, e);
                None
            }
        })
    }
}
