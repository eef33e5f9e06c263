//! Error types for spatial core operations.

use serde::{Deserialize, Serialize};

/// Errors surfaced to callers. Disposal failures never appear here; they are
/// logged where they happen.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SpatialError {
    /// Cache capacity must be at least one
    #[error("Invalid cache capacity: {capacity} (must be >= 1)")]
    InvalidCapacity { capacity: usize },

    /// Source id not present in the scene
    #[error("Source not found: {id}")]
    UnknownSource { id: u32 },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl SpatialError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidCapacity { .. } | Self::InvalidConfig { .. } => "config",
            Self::UnknownSource { .. } => "scene",
        }
    }
}
