//! Output contracts from `Scene::update()`.
//!
//! Outputs carry the interpolated pose of every tracked entity for this tick
//! plus the semantic events raised since the previous tick. Adapters apply the
//! poses to their audio graph and forward the events.

use serde::{Deserialize, Serialize};

use crate::ids::SourceId;
use crate::pose::Pose;

/// Which entity a pose belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PoseTarget {
    Listener,
    Source(SourceId),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseChange {
    pub target: PoseTarget,
    pub pose: Pose,
}

/// Discrete signals collected between ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SceneEvent {
    SourceAdded { source: SourceId },
    SourceRemoved { source: SourceId },
    ResourceEvicted { key: String },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<PoseChange>,
    #[serde(default)]
    pub events: Vec<SceneEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: PoseChange) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }
}
