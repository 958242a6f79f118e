//! MultiQueue configuration
//!
//! Configuration is fixed when a queue is built. Values come from a TOML
//! table (usually a `[queue]` section of the pipeline config) and may be
//! overridden by the caller before validation.

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::lane::LanePolicyKind;
use crate::queue::router::RouterKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PARTITION_COUNT: usize = 2;
pub const DEFAULT_TOTAL_CAPACITY: usize = 1 << 14;
pub const DEFAULT_LANE_COUNT: usize = 1;
pub const DEFAULT_BURST_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultiQueueConfig {
    /// Queue name, used in logs and Closed errors
    pub name: String,
    /// Items held across all partitions before producers block
    pub total_capacity: usize,
    /// Number of independently addressable partitions
    pub partition_count: usize,
    /// Write lanes feeding each partition
    pub lane_count: usize,
    /// Items a lane buffers before merging into its partition
    pub burst_size: usize,
    pub router: RouterKind,
    pub lane_policy: LanePolicyKind,
}

impl Default for MultiQueueConfig {
    fn default() -> Self {
        Self {
            name: "multiqueue".to_string(),
            total_capacity: DEFAULT_TOTAL_CAPACITY,
            partition_count: DEFAULT_PARTITION_COUNT,
            lane_count: DEFAULT_LANE_COUNT,
            burst_size: DEFAULT_BURST_SIZE,
            router: RouterKind::default(),
            lane_policy: LanePolicyKind::default(),
        }
    }
}

impl MultiQueueConfig {
    pub fn new(
        name: impl Into<String>,
        total_capacity: usize,
        partition_count: usize,
        lane_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            total_capacity,
            partition_count,
            lane_count,
            ..Self::default()
        }
    }

    pub fn with_burst_size(mut self, burst_size: usize) -> Self {
        self.burst_size = burst_size;
        self
    }

    pub fn with_router(mut self, router: RouterKind) -> Self {
        self.router = router;
        self
    }

    pub fn with_lane_policy(mut self, lane_policy: LanePolicyKind) -> Self {
        self.lane_policy = lane_policy;
        self
    }

    /// Reject configurations the queue cannot be built from
    pub fn validate(&self) -> QueueResult<()> {
        if self.partition_count < 1 {
            return Err(QueueError::config(format!(
                "partition_count must be at least 1 (got {})",
                self.partition_count
            )));
        }
        if self.lane_count < 1 {
            return Err(QueueError::config(format!(
                "lane_count must be at least 1 (got {})",
                self.lane_count
            )));
        }
        if self.burst_size < 1 {
            return Err(QueueError::config(format!(
                "burst_size must be at least 1 (got {})",
                self.burst_size
            )));
        }
        Ok(())
    }

    /// Capacity share of each partition: `ceil(total / partitions)`, at least 1
    pub fn partition_capacity(&self) -> usize {
        let partitions = self.partition_count.max(1);
        self.total_capacity.div_ceil(partitions).max(1)
    }

    /// Parse a configuration from TOML text
    ///
    /// Accepts either a bare table or one nested under `[queue]`.
    pub fn from_toml_str(contents: &str) -> QueueResult<Self> {
        let table: toml::Table = toml::from_str(contents)
            .map_err(|e| QueueError::config(format!("invalid TOML: {}", e)))?;

        let section = match table.get("queue") {
            Some(toml::Value::Table(queue)) => queue.clone(),
            Some(_) => return Err(QueueError::config("'queue' must be a table")),
            None => table,
        };

        let config: Self = toml::Value::Table(section)
            .try_into()
            .map_err(|e| QueueError::config(format!("invalid queue configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_file(path: &Path) -> QueueResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            QueueError::config(format!(
                "cannot read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Default configuration file location, if one exists
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("multiqueue").join("multiqueue.toml"))
            .filter(|path| path.exists())
    }
}
