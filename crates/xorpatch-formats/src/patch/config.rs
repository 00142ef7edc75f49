//! Configuration for patch generation and application

use crate::patch::error::{InputRole, PatchError, PatchResult};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default chunk size: 64 MiB
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Inputs above this size are logged as large (512 MiB)
pub const LARGE_INPUT_NOTICE: u64 = 512 * 1024 * 1024;

/// Default size above which inputs trigger a warning (2 GiB)
pub const DEFAULT_LARGE_INPUT_WARNING: u64 = 2 * 1024 * 1024 * 1024;

/// Configuration for a patch session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Number of bytes read from each input per iteration
    pub chunk_size: usize,

    /// Optional ceiling on the length of any input stream
    pub max_input_size: Option<u64>,

    /// Inputs larger than this are logged at warn level
    pub large_input_warning: u64,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_input_size: None,
            large_input_warning: DEFAULT_LARGE_INPUT_WARNING,
        }
    }
}

impl PatchConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk size (minimum 1 byte)
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = if chunk_size == 0 { 1 } else { chunk_size };
        self
    }

    /// Set a ceiling on input stream lengths
    #[must_use]
    pub const fn with_max_input_size(mut self, max_input_size: Option<u64>) -> Self {
        self.max_input_size = max_input_size;
        self
    }

    /// Set the size above which inputs are logged as a warning
    #[must_use]
    pub const fn with_large_input_warning(mut self, size: u64) -> Self {
        self.large_input_warning = size;
        self
    }

    /// Chunk size actually used, never zero even if deserialized as zero
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }

    /// Check an input length against the configured ceiling and log large inputs
    pub fn check_input_size(&self, role: InputRole, size: u64) -> PatchResult<()> {
        if let Some(limit) = self.max_input_size
            && size > limit
        {
            return Err(PatchError::SizeLimitExceeded { role, size, limit });
        }

        let gib = size as f64 / (1024.0 * 1024.0 * 1024.0);
        if size > self.large_input_warning {
            warn!(
                "The {role} is {gib:.2} GB in size; processing may take a significant amount of time"
            );
        } else if size > LARGE_INPUT_NOTICE {
            info!("Processing large {role} ({gib:.2} GB). This may take some time...");
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PatchConfig::default();
        assert_eq!(config.chunk_size, 64 * 1024 * 1024);
        assert_eq!(config.max_input_size, None);
        assert_eq!(config.large_input_warning, 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn test_chunk_size_is_clamped() {
        let config = PatchConfig::new().with_chunk_size(0);
        assert_eq!(config.chunk_size, 1);
        assert_eq!(config.effective_chunk_size(), 1);
    }

    #[test]
    fn test_check_input_size_ceiling() {
        let config = PatchConfig::new().with_max_input_size(Some(100));
        assert!(config.check_input_size(InputRole::Original, 100).is_ok());
        assert!(matches!(
            config.check_input_size(InputRole::Patch, 101),
            Err(PatchError::SizeLimitExceeded {
                role: InputRole::Patch,
                size: 101,
                limit: 100,
            })
        ));
    }

    #[test]
    fn test_config_deserializes_with_missing_fields() {
        let config: PatchConfig =
            serde_json::from_str(r#"{"chunk_size": 4096}"#).expect("valid config json");
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.large_input_warning, DEFAULT_LARGE_INPUT_WARNING);
    }

    #[test]
    fn test_config_zero_chunk_size_from_json() {
        let config: PatchConfig =
            serde_json::from_str(r#"{"chunk_size": 0}"#).expect("valid config json");
        assert_eq!(config.effective_chunk_size(), 1);
    }
}
