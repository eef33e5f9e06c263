//! Scene: the explicit context object owning all spatial state of a session.
//!
//! Holds the local listener pose, one interpolator per remote source and the
//! bounded resource cache. Nothing here is global; adapters create one Scene
//! on join and call `shutdown()` (or drop it) on leave.
//!
//! Methods:
//! - new, add_source, remove_source, set_*_target, update (poses → Outputs), shutdown

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cache::BoundedCache;
use crate::config::Config;
use crate::error::SpatialError;
use crate::ids::{IdAllocator, SourceId};
use crate::interpolator::{PoseInterpolator, Spatializer};
use crate::outputs::{Outputs, PoseChange, PoseTarget, SceneEvent};
use crate::pose::Pose;
use crate::vector::Vec3;

/// Metadata for a cached audio resource (decoded clip, remote stream handle).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: String,
    pub bytes: usize,
}

impl Resource {
    pub fn new(kind: impl Into<String>, bytes: usize) -> Self {
        Self {
            kind: kind.into(),
            bytes,
        }
    }
}

#[derive(Debug)]
pub struct Scene {
    cfg: Config,
    ids: IdAllocator,
    listener: PoseInterpolator,
    sources: IndexMap<SourceId, PoseInterpolator>,
    resources: BoundedCache<String, Resource>,

    // Events raised between ticks (shared with the cache eviction listener)
    pending: Rc<RefCell<Vec<SceneEvent>>>,

    // Per-tick outputs
    outputs: Outputs,
}

impl Scene {
    pub fn new(cfg: Config) -> Result<Self, SpatialError> {
        cfg.validate()?;

        let mut resources =
            BoundedCache::<String, Resource>::with_config(cfg.cache_config(), |key, res| {
                log::debug!("releasing resource {key} ({} bytes of {})", res.bytes, res.kind);
                Ok(())
            })?;

        let pending: Rc<RefCell<Vec<SceneEvent>>> = Rc::default();
        let sink = Rc::clone(&pending);
        resources.add_evicted_listener(move |evicted| {
            sink.borrow_mut().push(SceneEvent::ResourceEvicted {
                key: evicted.key.clone(),
            });
        });

        Ok(Self {
            cfg,
            ids: IdAllocator::new(),
            listener: PoseInterpolator::new(),
            sources: IndexMap::new(),
            resources,
            pending,
            outputs: Outputs::default(),
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn listener(&self) -> &PoseInterpolator {
        &self.listener
    }

    #[inline]
    pub fn listener_mut(&mut self) -> &mut PoseInterpolator {
        &mut self.listener
    }

    /// Move the listener over the configured transition time.
    pub fn set_listener_target(&mut self, p: Vec3, f: Vec3, u: Vec3, t: f32) {
        let dt = self.cfg.transition_time;
        self.listener.set_target(p, f, u, t, dt);
    }

    pub fn add_source(&mut self) -> SourceId {
        self.add_source_at(Pose::default())
    }

    /// Track a new source resting at `pose`.
    pub fn add_source_at(&mut self, pose: Pose) -> SourceId {
        // ids wrap around; never hand out one that is still live
        let mut id = self.ids.alloc_source();
        while self.sources.contains_key(&id) {
            id = self.ids.alloc_source();
        }
        self.sources.insert(id, PoseInterpolator::at(pose));
        self.pending
            .borrow_mut()
            .push(SceneEvent::SourceAdded { source: id });
        log::debug!("source {id:?} added");
        id
    }

    /// Stop tracking `id`, disposing its spatializer. Returns whether it existed.
    pub fn remove_source(&mut self, id: SourceId) -> bool {
        let Some(mut ip) = self.sources.shift_remove(&id) else {
            return false;
        };
        ip.dispose();
        self.pending
            .borrow_mut()
            .push(SceneEvent::SourceRemoved { source: id });
        log::debug!("source {id:?} removed");
        true
    }

    pub fn has_source(&self, id: SourceId) -> bool {
        self.sources.contains_key(&id)
    }

    pub fn source(&self, id: SourceId) -> Option<&PoseInterpolator> {
        self.sources.get(&id)
    }

    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut PoseInterpolator> {
        self.sources.get_mut(&id)
    }

    /// Source ids in insertion order.
    pub fn source_ids(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.sources.keys().copied()
    }

    fn source_or_err(&mut self, id: SourceId) -> Result<&mut PoseInterpolator, SpatialError> {
        self.sources
            .get_mut(&id)
            .ok_or(SpatialError::UnknownSource { id: id.0 })
    }

    pub fn set_source_target(
        &mut self,
        id: SourceId,
        p: Vec3,
        f: Vec3,
        u: Vec3,
        t: f32,
    ) -> Result<(), SpatialError> {
        let dt = self.cfg.transition_time;
        self.source_or_err(id)?.set_target(p, f, u, t, dt);
        Ok(())
    }

    pub fn set_source_target_position(
        &mut self,
        id: SourceId,
        p: Vec3,
        t: f32,
    ) -> Result<(), SpatialError> {
        let dt = self.cfg.transition_time;
        self.source_or_err(id)?.set_target_position(p, t, dt);
        Ok(())
    }

    pub fn set_source_target_orientation(
        &mut self,
        id: SourceId,
        f: Vec3,
        u: Vec3,
        t: f32,
    ) -> Result<(), SpatialError> {
        let dt = self.cfg.transition_time;
        self.source_or_err(id)?.set_target_orientation(f, u, t, dt);
        Ok(())
    }

    /// Attach (or detach with `None`) a source's spatializer. The previous one
    /// is disposed.
    pub fn set_source_spatializer(
        &mut self,
        id: SourceId,
        spatializer: Option<Box<dyn Spatializer>>,
    ) -> Result<(), SpatialError> {
        self.source_or_err(id)?.set_spatializer(spatializer);
        Ok(())
    }

    #[inline]
    pub fn resources(&self) -> &BoundedCache<String, Resource> {
        &self.resources
    }

    #[inline]
    pub fn resources_mut(&mut self) -> &mut BoundedCache<String, Resource> {
        &mut self.resources
    }

    /// Advance every pose to time `t` and collect this tick's outputs.
    pub fn update(&mut self, t: f32) -> &Outputs {
        self.outputs.clear();

        self.listener.update(t);
        self.outputs.push_change(PoseChange {
            target: PoseTarget::Listener,
            pose: *self.listener.current(),
        });

        for (id, ip) in self.sources.iter_mut() {
            ip.update(t);
            self.outputs.push_change(PoseChange {
                target: PoseTarget::Source(*id),
                pose: *ip.current(),
            });
        }

        for event in self.pending.borrow_mut().drain(..) {
            self.outputs.push_event(event);
        }
        &self.outputs
    }

    /// Dispose every spatializer, clear the resource cache and forget all
    /// sources. Cleared resources are disposed unless the configured
    /// `DisposalPolicy` is `EvictionOnly`. The scene stays usable afterwards,
    /// starting from an empty state.
    pub fn shutdown(&mut self) {
        self.listener.dispose();
        for (_, mut ip) in self.sources.drain(..) {
            ip.dispose();
        }
        self.resources.clear();
        self.ids.reset();
        self.pending.borrow_mut().clear();
        self.outputs.clear();
        log::debug!("scene shut down");
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.shutdown();
    }
}
