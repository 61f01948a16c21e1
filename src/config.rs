//! Archive configuration with TOML persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::square::CodecKind;
use crate::types::{EdsError, EdsResult, SHARE_SIZE};

/// Settings for [`crate::format::EdsWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Inner nodes staged per flush. `None` sizes the batch to hold every
    /// inner node of the square.
    pub batch_size: Option<usize>,

    /// Buffer size for file output, in bytes.
    pub buffer_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            batch_size: None,
            buffer_capacity: 64 * 1024,
        }
    }
}

/// Complete configuration used by the `edsar` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Size of each share in input files.
    pub share_size: usize,

    /// Codec used to extend original data.
    pub codec: CodecKind,

    /// Writer settings.
    pub writer: WriterConfig,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            share_size: SHARE_SIZE,
            codec: CodecKind::default(),
            writer: WriterConfig::default(),
        }
    }
}

impl ArchiveConfig {
    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> EdsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| EdsError::Config(e.to_string()))
    }

    /// Save as pretty TOML.
    pub fn save(&self, path: &Path) -> EdsResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| EdsError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
