//! config.rs
//! Dispatcher policy: default level and decompression ceiling.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LEVEL, MAX_DECOMPRESSED_SIZE};
use crate::types::{BindError, BindResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Level used when compress or dictionary creation gets no level.
    pub default_level: i32,
    /// Largest declared decompressed size accepted, in bytes.
    pub max_decompressed_size: usize,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            default_level: DEFAULT_LEVEL,
            max_decompressed_size: MAX_DECOMPRESSED_SIZE,
        }
    }
}

impl BindConfig {
    pub fn with_default_level(mut self, level: i32) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_max_decompressed_size(mut self, max: usize) -> Self {
        self.max_decompressed_size = max;
        self
    }

    pub fn validate(&self) -> BindResult<()> {
        if self.max_decompressed_size == 0 {
            return Err(BindError::argument("max_decompressed_size must be greater than zero"));
        }
        Ok(())
    }
}
