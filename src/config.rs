//! Configuration types for edgecam

use crate::error::{Error, Result};
use crate::filter::Mode;
use crate::types::Resolution;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Filter and pipeline configuration
///
/// Loaded from TOML; every field is optional in the file.
///
/// ```toml
/// mode = "edge-detect"
/// parallel = true
/// queue_capacity = 4
/// max_resolution = { width = 1280, height = 720 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Initial filter mode
    pub mode: Mode,
    /// Shard the interior scan across the rayon pool
    pub parallel: bool,
    /// Collect and log edge statistics for every edge-detected frame
    pub log_stats: bool,
    /// Frames buffered between the producer and the filter worker
    pub queue_capacity: usize,
    /// Largest frame the pipeline accepts (None = unlimited)
    pub max_resolution: Option<Resolution>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            mode: Mode::EdgeDetect,
            parallel: false,
            log_stats: false,
            queue_capacity: 4,
            max_resolution: None,
        }
    }
}

impl FilterConfig {
    /// Settings for a phone-style camera preview (720p cap, parallel scan)
    pub fn camera_preview() -> Self {
        Self {
            parallel: true,
            max_resolution: Some(Resolution::HD_720P),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_log_stats(mut self, log_stats: bool) -> Self {
        self.log_stats = log_stats;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_max_resolution(mut self, width: u32, height: u32) -> Self {
        self.max_resolution = Some(Resolution::new(width, height));
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: FilterConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded filter config from {}", path.display());
        Ok(config)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(Error::Config("queue_capacity must be at least 1".into()));
        }
        if let Some(res) = self.max_resolution {
            if res.width == 0 || res.height == 0 {
                return Err(Error::Config(format!(
                    "max_resolution must be positive, got {}",
                    res
                )));
            }
        }
        Ok(())
    }
}
