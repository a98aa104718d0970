//! Processing configuration.
//!
//! All settings come from command-line flags; there is no config file. The
//! CLI builds a [`ProcessingConfig`] once, before touching the filesystem, and
//! passes it by reference into every processing entry point.
//!
//! ## Options
//!
//! ```text
//! quality            = 85     # JPEG quality of the medium copy (1-100)
//! thumbnail_quality  = 70     # JPEG quality of the square thumbnail (1-100)
//! max_processes      = auto   # Max parallel workers (omit for CPU cores)
//! ```

use crate::imaging::{ParamError, Quality};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {field}: {source}")]
    Param {
        field: &'static str,
        #[source]
        source: ParamError,
    },
    #[error("config validation error: {0}")]
    Validation(String),
}

const DEFAULT_QUALITY: u32 = 85;
const DEFAULT_THUMBNAIL_QUALITY: u32 = 70;

/// Settings shared by every image in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingConfig {
    /// Encoding quality of the `_md.jpg` output.
    pub quality: Quality,
    /// Encoding quality of the `_sq_thumb.jpg` output.
    pub thumbnail_quality: Quality,
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

impl ProcessingConfig {
    /// Build a config from raw quality values, rejecting anything outside 1-100.
    pub fn new(quality: u32, thumbnail_quality: u32) -> Result<Self, ConfigError> {
        let quality = Quality::new(quality).map_err(|source| ConfigError::Param {
            field: "quality",
            source,
        })?;
        let thumbnail_quality =
            Quality::new(thumbnail_quality).map_err(|source| ConfigError::Param {
                field: "thumbnail quality",
                source,
            })?;
        Ok(Self {
            quality,
            thumbnail_quality,
            max_processes: None,
        })
    }

    pub fn with_max_processes(mut self, max_processes: Option<usize>) -> Self {
        self.max_processes = max_processes;
        self
    }

    /// Validate values that aren't already guarded by their types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "jobs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            quality: Quality::new(DEFAULT_QUALITY).unwrap_or_default(),
            thumbnail_quality: Quality::new(DEFAULT_THUMBNAIL_QUALITY).unwrap_or_default(),
            max_processes: None,
        }
    }
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}
