//! Configuration file loading and CLI overrides
//!
//! An explicitly named file must exist. Without one, the default location
//! under the user's config directory is used when present.

use super::args::Args;
use crate::queue::{MultiQueueConfig, QueueError, QueueResult};
use std::path::PathBuf;

impl Args {
    /// The configuration file to load, if any
    pub fn config_path(&self) -> QueueResult<Option<PathBuf>> {
        match &self.config_file {
            Some(path) if !path.exists() => Err(QueueError::config(format!(
                "The specified configuration file does not exist: {}",
                path.display()
            ))),
            Some(path) => Ok(Some(path.clone())),
            None => Ok(MultiQueueConfig::default_path()),
        }
    }

    /// Final queue configuration: file (or defaults) with CLI overrides applied
    pub fn queue_config(&self) -> QueueResult<MultiQueueConfig> {
        let base = match self.config_path()? {
            Some(path) => {
                log::debug!("loading queue configuration from {}", path.display());
                MultiQueueConfig::from_file(&path)?
            }
            None => MultiQueueConfig::default(),
        };

        let config = self.apply_overrides(base);
        config.validate()?;
        Ok(config)
    }

    /// Overlay every queue option given on the command line
    pub fn apply_overrides(&self, mut config: MultiQueueConfig) -> MultiQueueConfig {
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(partitions) = self.partitions {
            config.partition_count = partitions;
        }
        if let Some(lanes) = self.lanes {
            config.lane_count = lanes;
        }
        if let Some(capacity) = self.capacity {
            config.total_capacity = capacity;
        }
        if let Some(burst) = self.burst {
            config.burst_size = burst;
        }
        if let Some(router) = self.router {
            config.router = router;
        }
        if let Some(lane_policy) = self.lane_policy {
            config.lane_policy = lane_policy;
        }
        config
    }
}
