//! Partitioned MultiQueue Component
//!
//! The decoupling queue between ingestion decoders and batched writers. A
//! MultiQueue is a fixed set of bounded FIFO partitions; producers route
//! every item to a partition by key, consumers read one partition each.
//!
//! # Overview
//!
//! - **Key Routing**: a deterministic router maps each routing key to one
//!   partition, so related items (one flow, one resource) stay in one FIFO
//! - **Write Lanes**: each partition is fed by several lanes that buffer a
//!   burst before taking the partition lock, cutting producer contention
//! - **Blocking Backpressure**: producers wait while a partition is full,
//!   consumers wait while it is empty; there is no drop policy
//! - **Batched Reads**: consumers fill whole batches with one call
//! - **Cooperative Shutdown**: `close` wakes every waiter; buffered items
//!   stay readable until drained
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  ┌────────────┐  ┌────────────┐
//! │ Decoder A  │  │ Decoder B  │  │ Decoder C  │   producers
//! └─────┬──────┘  └─────┬──────┘  └─────┬──────┘
//!       │ put(key)      │ puts(keys)    │ put(key)
//!       ▼               ▼               ▼
//! ┌──────────────────── Router ─────────────────────┐
//! │        key -> partition index (pure)            │
//! └──────┬──────────────────┬──────────────────┬────┘
//!        ▼                  ▼                  ▼
//!   lane0 lane1        lane0 lane1        lane0 lane1   write lanes
//!     └──┬──┘            └──┬──┘            └──┬──┘
//!        ▼                  ▼                  ▼
//!  ┌───────────┐      ┌───────────┐      ┌───────────┐
//!  │partition 0│      │partition 1│      │partition 2│   bounded FIFOs
//!  └─────┬─────┘      └─────┬─────┘      └─────┬─────┘
//!        │ get/gets         │                  │
//!  ┌─────┴─────┐      ┌─────┴─────┐      ┌─────┴─────┐
//!  │ Writer 0  │      │ Writer 1  │      │ Writer 2  │   consumers
//!  └───────────┘      └───────────┘      └───────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use multiqueue::queue::{MultiQueue, MultiQueueConfig};
//! use std::thread;
//!
//! # fn example() -> Result<(), multiqueue::queue::QueueError> {
//! let queue = MultiQueue::shared(MultiQueueConfig::new("flow-log", 4096, 2, 4))?;
//!
//! let producer = queue.create_producer("decoder-0");
//! let worker = thread::spawn(move || {
//!     for flow_id in 0u64..100 {
//!         producer.put(flow_id, format!("flow {}", flow_id))?;
//!     }
//!     Ok::<_, multiqueue::queue::QueueError>(())
//! });
//!
//! let consumer = queue.create_consumer("writer-0", 0)?;
//! let batch = consumer.read_batch(50)?;
//! assert_eq!(batch.len(), 50);
//!
//! worker.join().expect("producer panicked")?;
//! queue.close();
//! # Ok(())
//! # }
//! ```

pub mod api;
mod config;
mod consumer;
mod error;
mod lane;
mod multi_queue;
mod partition;
mod producer;
mod router;
mod types;

pub use config::{
    MultiQueueConfig, DEFAULT_BURST_SIZE, DEFAULT_LANE_COUNT, DEFAULT_PARTITION_COUNT,
    DEFAULT_TOTAL_CAPACITY,
};
pub use consumer::QueueConsumer;
pub use error::{QueueError, QueueResult};
pub use lane::{FixedLane, LanePolicy, LanePolicyKind, RoundRobinLanes, ThreadAffineLanes, WriteLane};
pub use multi_queue::MultiQueue;
pub use partition::Partition;
pub use producer::QueueProducer;
pub use router::{MixRouter, ModuloRouter, Router, RouterKind, RoutingKey};
pub use types::{PartitionStats, QueueStats};

#[cfg(test)]
mod tests;
