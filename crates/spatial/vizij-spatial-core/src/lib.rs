//! Vizij Spatial Core (engine-agnostic)
//!
//! Building blocks for positional audio: timestamped poses and their
//! interpolation, a capacity-bounded resource cache with disposal, a small
//! listener registry, and the `Scene` context that owns them for a session.

pub mod bindings;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod interpolator;
pub mod outputs;
pub mod pose;
pub mod scene;
pub mod vector;

// Re-exports for consumers (adapters)
pub use bindings::{BindingChanged, BindingName, InputBindings};
pub use cache::{BoundedCache, DisposeHook, Evicted};
pub use config::{CacheConfig, Config, DisposalPolicy};
pub use error::SpatialError;
pub use events::Listeners;
pub use ids::{ListenerId, SourceId};
pub use interpolator::{PoseInterpolator, Spatializer};
pub use outputs::{Outputs, PoseChange, PoseTarget, SceneEvent};
pub use pose::Pose;
pub use scene::{Resource, Scene};
pub use vector::Vec3;
