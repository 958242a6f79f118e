//! Bounded FIFO partition with blocking push/pop
//!
//! A partition is the unit of storage and the unit consumers address. Its
//! buffer is the only state shared between producer and consumer threads and
//! is guarded by one mutex with two condition variables: `not_empty` for
//! waiting consumers and `not_full` for waiting producers.

use crate::core::sync::{handle_mutex_poison, lock_ignoring_poison};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::types::PartitionStats;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct PartitionState<T> {
    buffer: VecDeque<T>,
    closed: bool,
    pushed: u64,
    popped: u64,
}

/// One independently addressable bounded FIFO
#[derive(Debug)]
pub struct Partition<T> {
    index: usize,
    capacity: usize,
    queue_name: Arc<str>,
    state: Mutex<PartitionState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> Partition<T> {
    /// Create a partition; `capacity` is clamped to at least 1
    pub fn new(queue_name: Arc<str>, index: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            index,
            capacity,
            queue_name,
            state: Mutex::new(PartitionState {
                buffer: VecDeque::with_capacity(capacity.min(4096)),
                closed: false,
                pushed: 0,
                popped: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        lock_ignoring_poison(self.state.lock()).buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        lock_ignoring_poison(self.state.lock()).closed
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, PartitionState<T>>> {
        handle_mutex_poison(self.state.lock(), |message| QueueError::Poisoned { message })
    }

    fn wait<'a>(
        &self,
        condvar: &Condvar,
        guard: MutexGuard<'a, PartitionState<T>>,
    ) -> QueueResult<MutexGuard<'a, PartitionState<T>>> {
        handle_mutex_poison(condvar.wait(guard), |message| QueueError::Poisoned {
            message,
        })
    }

    fn closed_error(&self) -> QueueError {
        QueueError::Closed {
            name: self.queue_name.to_string(),
        }
    }

    /// Append one item, blocking while the partition is full
    pub fn push(&self, item: T) -> QueueResult<()> {
        let mut state = self.lock()?;
        loop {
            if state.closed {
                return Err(self.closed_error());
            }
            if state.buffer.len() < self.capacity {
                break;
            }
            state = self.wait(&self.not_full, state)?;
        }
        state.buffer.push_back(item);
        state.pushed += 1;
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Append a burst in order under a single lock acquisition
    ///
    /// Blocks for space item by item. Consumers are woken before every wait
    /// so a burst larger than the capacity cannot stall the partition. If the
    /// queue closes part way, the items already appended stay poppable and
    /// the rest are dropped with a Closed error.
    pub fn push_all(&self, items: Vec<T>) -> QueueResult<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut appended = 0;
        let mut state = self.lock()?;
        for item in items {
            loop {
                if state.closed {
                    drop(state);
                    if appended > 0 {
                        self.not_empty.notify_all();
                    }
                    return Err(self.closed_error());
                }
                if state.buffer.len() < self.capacity {
                    break;
                }
                self.not_empty.notify_all();
                state = self.wait(&self.not_full, state)?;
            }
            state.buffer.push_back(item);
            state.pushed += 1;
            appended += 1;
        }
        drop(state);
        self.not_empty.notify_all();
        Ok(appended)
    }

    /// Pop the oldest item, blocking while the partition is empty and open
    pub fn pop(&self) -> QueueResult<T> {
        let mut state = self.lock()?;
        loop {
            if let Some(item) = state.buffer.pop_front() {
                state.popped += 1;
                drop(state);
                self.not_full.notify_one();
                return Ok(item);
            }
            if state.closed {
                return Err(self.closed_error());
            }
            state = self.wait(&self.not_empty, state)?;
        }
    }

    /// Pop without blocking; `Ok(None)` when empty but still open
    pub fn try_pop(&self) -> QueueResult<Option<T>> {
        let mut state = self.lock()?;
        match state.buffer.pop_front() {
            Some(item) => {
                state.popped += 1;
                drop(state);
                self.not_full.notify_one();
                Ok(Some(item))
            }
            None if state.closed => Err(self.closed_error()),
            None => Ok(None),
        }
    }

    /// Pop with a bounded wait; `Ok(None)` when the timeout elapses first
    pub fn pop_timeout(&self, timeout: Duration) -> QueueResult<Option<T>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock()?;
        loop {
            if let Some(item) = state.buffer.pop_front() {
                state.popped += 1;
                drop(state);
                self.not_full.notify_one();
                return Ok(Some(item));
            }
            if state.closed {
                return Err(self.closed_error());
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let (guard, _) = handle_mutex_poison(
                self.not_empty.wait_timeout(state, deadline - now),
                |message| QueueError::Poisoned { message },
            )?;
            state = guard;
        }
    }

    /// Collect exactly `n` items into `out`, blocking until they arrive
    ///
    /// Items are drained as they become available, so `n` may exceed the
    /// partition capacity. Returns fewer than `n` only when the queue closed
    /// first; returns Closed if it closed before anything was collected.
    pub fn pop_batch_into(&self, out: &mut Vec<T>, n: usize) -> QueueResult<usize> {
        if n == 0 {
            return Ok(0);
        }

        out.reserve(n.min(self.capacity));
        let mut collected = 0;
        let mut state = self.lock()?;
        loop {
            let take = (n - collected).min(state.buffer.len());
            if take > 0 {
                out.extend(state.buffer.drain(..take));
                state.popped += take as u64;
                collected += take;
                self.not_full.notify_all();
            }
            if collected == n {
                return Ok(collected);
            }
            if state.closed {
                return if collected == 0 {
                    Err(self.closed_error())
                } else {
                    Ok(collected)
                };
            }
            state = self.wait(&self.not_empty, state)?;
        }
    }

    /// Block until at least one item is buffered, then take up to `max`
    pub fn pop_available_into(&self, out: &mut Vec<T>, max: usize) -> QueueResult<usize> {
        if max == 0 {
            return Ok(0);
        }

        let mut state = self.lock()?;
        loop {
            if !state.buffer.is_empty() {
                let take = max.min(state.buffer.len());
                out.extend(state.buffer.drain(..take));
                state.popped += take as u64;
                drop(state);
                self.not_full.notify_all();
                return Ok(take);
            }
            if state.closed {
                return Err(self.closed_error());
            }
            state = self.wait(&self.not_empty, state)?;
        }
    }

    /// Mark closed and wake every blocked pusher and popper
    pub fn drain_close(&self) {
        let mut state = lock_ignoring_poison(self.state.lock());
        state.closed = true;
        drop(state);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn stats(&self) -> PartitionStats {
        let state = lock_ignoring_poison(self.state.lock());
        PartitionStats {
            index: self.index,
            len: state.buffer.len(),
            capacity: self.capacity,
            pushed: state.pushed,
            popped: state.popped,
            closed: state.closed,
        }
    }
}
