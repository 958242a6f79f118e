//! Load driver
//!
//! Producer tasks write synthetic flow records keyed by flow id; one consumer
//! task per partition drains it in batches and checks that every producer's
//! records for a flow arrive in the order they were written. The blocking
//! queue calls run on tokio's blocking pool.

use crate::queue::{MultiQueue, QueueConsumer, QueueError, QueueProducer, QueueResult, QueueStats};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// One synthetic telemetry record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowRecord {
    pub flow_id: u64,
    pub producer: usize,
    pub sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    pub producers: usize,
    pub items_per_producer: usize,
    pub batch_size: usize,
    pub flows: usize,
}

impl DriverSettings {
    pub fn expected_records(&self) -> u64 {
        (self.producers * self.items_per_producer) as u64
    }
}

impl From<&super::cli::Args> for DriverSettings {
    fn from(args: &super::cli::Args) -> Self {
        Self {
            producers: args.producers,
            items_per_producer: args.items,
            batch_size: args.batch_size,
            flows: args.flows,
        }
    }
}

/// What one consumer saw on its partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionTally {
    pub partition: usize,
    pub consumed: u64,
    pub batches: u64,
    /// Records that arrived behind a later record of the same producer and flow
    pub out_of_order: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverReport {
    pub produced: u64,
    pub expected: u64,
    pub elapsed_ms: u64,
    pub interrupted: bool,
    pub partitions: Vec<PartitionTally>,
    pub queue: QueueStats,
}

impl DriverReport {
    pub fn consumed(&self) -> u64 {
        self.partitions.iter().map(|p| p.consumed).sum()
    }

    pub fn out_of_order(&self) -> u64 {
        self.partitions.iter().map(|p| p.out_of_order).sum()
    }

    pub fn records_per_second(&self) -> f64 {
        if self.elapsed_ms == 0 {
            return self.consumed() as f64;
        }
        self.consumed() as f64 * 1000.0 / self.elapsed_ms as f64
    }
}

/// Flow id for the `sequence`-th record of `producer`
///
/// Producers walk the flow space from different offsets so every partition
/// sees several writers.
pub fn flow_id(producer: usize, sequence: u64, flows: usize) -> u64 {
    let flows = flows.max(1) as u64;
    (sequence.wrapping_mul(7) + producer as u64 * 13) % flows
}

/// Run producers and consumers to completion, then close the queue
///
/// Returns early with `interrupted` set if the queue is closed underneath
/// the run (for example by a shutdown signal).
pub async fn run(
    queue: Arc<MultiQueue<FlowRecord>>,
    settings: DriverSettings,
) -> QueueResult<DriverReport> {
    let started = Instant::now();
    log::info!(
        "driving {} records through '{}' ({} producers, {} partitions, {} lanes)",
        settings.expected_records(),
        queue.name(),
        settings.producers,
        queue.partition_count(),
        queue.lane_count()
    );

    let consumers = (0..queue.partition_count())
        .map(|partition| {
            let consumer = queue.create_consumer(format!("consumer-{}", partition), partition)?;
            let batch_size = settings.batch_size;
            Ok(tokio::task::spawn_blocking(move || {
                drain_partition(consumer, batch_size)
            }))
        })
        .collect::<QueueResult<Vec<_>>>()?;

    let producers: Vec<JoinHandle<QueueResult<u64>>> = (0..settings.producers)
        .map(|id| {
            let producer = queue.create_producer(format!("producer-{}", id));
            tokio::task::spawn_blocking(move || produce(producer, id, settings))
        })
        .collect();

    let mut produced = 0;
    let mut first_error = None;
    for handle in producers {
        match join(handle, "producer").await {
            Ok(count) => produced += count,
            Err(e) => {
                // Closing lets the consumers finish so the error can be reported
                queue.close();
                first_error.get_or_insert(e);
            }
        }
    }

    queue.close();

    let mut partitions = Vec::with_capacity(consumers.len());
    for handle in consumers {
        match join(handle, "consumer").await {
            Ok(tally) => partitions.push(tally),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(error) = first_error {
        return Err(error);
    }

    let report = DriverReport {
        produced,
        expected: settings.expected_records(),
        elapsed_ms: started.elapsed().as_millis() as u64,
        interrupted: produced < settings.expected_records(),
        partitions,
        queue: queue.stats(),
    };

    log::info!(
        "run finished: produced {} consumed {} in {} ms",
        report.produced,
        report.consumed(),
        report.elapsed_ms
    );
    if report.out_of_order() > 0 {
        log::warn!("{} records arrived out of order", report.out_of_order());
    }
    Ok(report)
}

async fn join<R>(handle: JoinHandle<QueueResult<R>>, role: &str) -> QueueResult<R> {
    handle.await.map_err(|e| QueueError::Poisoned {
        message: format!("{} task failed: {}", role, e),
    })?
}

/// Write this producer's records in batches; stops quietly when the queue closes
fn produce(
    producer: QueueProducer<FlowRecord>,
    id: usize,
    settings: DriverSettings,
) -> QueueResult<u64> {
    let total = settings.items_per_producer as u64;
    let batch_size = settings.batch_size.max(1) as u64;
    let mut written = 0;

    while written < total {
        let end = (written + batch_size).min(total);
        let items: Vec<FlowRecord> = (written..end)
            .map(|sequence| FlowRecord {
                flow_id: flow_id(id, sequence, settings.flows),
                producer: id,
                sequence,
            })
            .collect();
        let keys: Vec<u64> = items.iter().map(|record| record.flow_id).collect();

        match producer.puts_exact(&keys, items) {
            Ok(accepted) => written += accepted as u64,
            Err(e) if e.is_closed() => {
                log::debug!(
                    "{} stopped after {} records: {}",
                    producer.producer_id(),
                    written,
                    e
                );
                break;
            }
            Err(e) => return Err(e),
        }
    }

    log::debug!(
        "{} wrote {} records on lane {}",
        producer.producer_id(),
        written,
        producer.lane()
    );
    Ok(written)
}

/// Read batches until the partition is closed and drained
fn drain_partition(
    consumer: QueueConsumer<FlowRecord>,
    batch_size: usize,
) -> QueueResult<PartitionTally> {
    let mut tally = PartitionTally {
        partition: consumer.partition(),
        ..PartitionTally::default()
    };
    let mut last_seen: HashMap<(usize, u64), u64> = HashMap::new();
    let mut batch = Vec::with_capacity(batch_size);

    loop {
        batch.clear();
        match consumer.read_batch_into(&mut batch, batch_size) {
            Ok(_) => {}
            Err(e) if e.is_closed() => break,
            Err(e) => return Err(e),
        }

        tally.batches += 1;
        for record in &batch {
            tally.consumed += 1;
            match last_seen.insert((record.producer, record.flow_id), record.sequence) {
                Some(previous) if previous >= record.sequence => tally.out_of_order += 1,
                _ => {}
            }
        }
    }

    log::debug!(
        "{} drained {} records in {} batches",
        consumer.consumer_id(),
        tally.consumed,
        tally.batches
    );
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{LanePolicyKind, MultiQueueConfig, RouterKind};

    fn settings(producers: usize, items: usize) -> DriverSettings {
        DriverSettings {
            producers,
            items_per_producer: items,
            batch_size: 16,
            flows: 37,
        }
    }

    #[test]
    fn test_flow_id_stays_in_range() {
        for producer in 0..4 {
            for sequence in 0..100 {
                assert!(flow_id(producer, sequence, 37) < 37);
            }
        }
        assert_eq!(flow_id(3, 9, 0), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_delivers_every_record() {
        let queue = MultiQueue::shared(MultiQueueConfig::new("driver", 64, 4, 2)).unwrap();
        let report = run(Arc::clone(&queue), settings(6, 500)).await.unwrap();

        assert_eq!(report.produced, 3000);
        assert_eq!(report.consumed(), 3000);
        assert_eq!(report.out_of_order(), 0);
        assert!(!report.interrupted);
        assert!(report.queue.closed);
        assert_eq!(report.queue.total_len(), 0);
        assert_eq!(report.partitions.len(), 4);
        println!("✓ {} records in {} ms", report.consumed(), report.elapsed_ms);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_with_mix_router_and_round_robin_lanes() {
        let config = MultiQueueConfig::new("driver-mix", 32, 3, 3)
            .with_router(RouterKind::Mix)
            .with_lane_policy(LanePolicyKind::RoundRobin)
            .with_burst_size(4);
        let queue = MultiQueue::shared(config).unwrap();
        let report = run(queue, settings(5, 200)).await.unwrap();

        assert_eq!(report.consumed(), report.produced);
        assert_eq!(report.out_of_order(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_on_closed_queue_is_interrupted() {
        let queue = MultiQueue::shared(MultiQueueConfig::new("closed", 16, 2, 1)).unwrap();
        queue.close();

        let report = run(queue, settings(2, 50)).await.unwrap();
        assert!(report.interrupted);
        assert_eq!(report.produced, 0);
        assert_eq!(report.consumed(), 0);
    }

    #[test]
    fn test_report_rates() {
        let report = DriverReport {
            produced: 10,
            expected: 10,
            elapsed_ms: 500,
            interrupted: false,
            partitions: vec![PartitionTally {
                partition: 0,
                consumed: 10,
                batches: 2,
                out_of_order: 0,
            }],
            queue: MultiQueue::<u8>::init("rates", 4, 1, 1).unwrap().stats(),
        };
        assert_eq!(report.records_per_second(), 20.0);
    }
}
