//! Core configuration for vizij-spatial-core.

use serde::{Deserialize, Serialize};

use crate::error::SpatialError;

/// Which removals hand values to the cache's disposal hook.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisposalPolicy {
    /// Eviction, overwrite, `delete` and `clear` all dispose.
    #[default]
    Always,
    /// Only capacity-driven eviction disposes; `delete`, `clear` and
    /// overwrites drop values silently.
    EvictionOnly,
}

/// Settings for a standalone `BoundedCache`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub capacity: usize,
    #[serde(default)]
    pub disposal: DisposalPolicy,
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            disposal: DisposalPolicy::default(),
        }
    }

    pub fn validate(&self) -> Result<(), SpatialError> {
        if self.capacity == 0 {
            return Err(SpatialError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

/// Configuration for a `Scene`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of cached audio resources.
    pub resource_capacity: usize,
    /// Seconds a source takes to reach a newly announced position.
    pub transition_time: f32,
    pub disposal: DisposalPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource_capacity: 32,
            transition_time: 0.125,
            disposal: DisposalPolicy::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), SpatialError> {
        self.cache_config().validate()?;
        if !self.transition_time.is_finite() || self.transition_time < 0.0 {
            return Err(SpatialError::InvalidConfig {
                reason: format!("transition_time must be >= 0, got {}", self.transition_time),
            });
        }
        Ok(())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            capacity: self.resource_capacity,
            disposal: self.disposal,
        }
    }
}
