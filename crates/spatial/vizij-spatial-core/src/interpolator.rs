//! PoseInterpolator: smooth pose transitions for a moving listener or source.
//!
//! Every retarget starts a new segment from wherever the entity currently is,
//! so changing destination mid-transition never makes the pose jump.

use std::fmt;

use crate::pose::Pose;
use crate::vector::{add3, sub3, Vec3};

/// Renders a pose into an audio-positioning effect (panner node, HRTF, ...).
///
/// Adapters (WASM/native audio) implement this and attach it to a
/// `PoseInterpolator`, which takes ownership and disposes it exactly once.
pub trait Spatializer {
    fn update(&mut self, pose: &Pose);

    /// Release audio resources. Failures are logged by the caller.
    fn dispose(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Start/current/end pose triple plus an optional attached spatializer.
#[derive(Default)]
pub struct PoseInterpolator {
    start: Pose,
    current: Pose,
    end: Pose,
    offset: Vec3,
    // offset included in `current.p`
    applied_offset: Vec3,
    spatializer: Option<Box<dyn Spatializer>>,
}

impl fmt::Debug for PoseInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseInterpolator")
            .field("start", &self.start)
            .field("current", &self.current)
            .field("end", &self.end)
            .field("offset", &self.offset)
            .field("has_spatializer", &self.spatializer.is_some())
            .finish()
    }
}

fn dispose_spatializer(mut spatializer: Box<dyn Spatializer>) {
    if let Err(err) = spatializer.dispose() {
        log::warn!("failed to dispose spatializer: {err:#}");
    }
}

impl PoseInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpolator resting at `pose` (start, current and end all equal).
    pub fn at(pose: Pose) -> Self {
        Self {
            start: pose,
            current: pose,
            end: pose,
            offset: [0.0; 3],
            applied_offset: [0.0; 3],
            spatializer: None,
        }
    }

    #[inline]
    pub fn start(&self) -> &Pose {
        &self.start
    }

    #[inline]
    pub fn current(&self) -> &Pose {
        &self.current
    }

    #[inline]
    pub fn end(&self) -> &Pose {
        &self.end
    }

    #[inline]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Positional offset added to the blended position on every update.
    /// Targets are left untouched; the new offset shows up in `current` at
    /// the next `update`.
    #[inline]
    pub fn set_offset(&mut self, offset: Vec3) {
        self.offset = offset;
    }

    /// Begin a new segment from the current pose (stamped `t`) to the given
    /// pose at `t + dt`. Negative `dt` is treated as zero.
    pub fn set_target(&mut self, p: Vec3, f: Vec3, u: Vec3, t: f32, dt: f32) {
        self.begin_segment(t);
        self.end.set_position(p);
        self.end.set_orientation(f, u);
        self.end.t = t + dt.max(0.0);
        log::trace!("pose retarget t={t} dt={dt} p={p:?}");
    }

    /// Like `set_target`, keeping the previous end orientation.
    pub fn set_target_position(&mut self, p: Vec3, t: f32, dt: f32) {
        let (f, u) = (self.end.f, self.end.u);
        self.set_target(p, f, u, t, dt);
    }

    /// Like `set_target`, keeping the previous end position.
    pub fn set_target_orientation(&mut self, f: Vec3, u: Vec3, t: f32, dt: f32) {
        let p = self.end.p;
        self.set_target(p, f, u, t, dt);
    }

    fn begin_segment(&mut self, t: f32) {
        self.start = self.current;
        // segments are kept in target space
        self.start.p = sub3(self.current.p, self.applied_offset);
        self.start.t = t;
    }

    /// Recompute `current` for time `t` and forward it to the spatializer.
    pub fn update(&mut self, t: f32) {
        let mut pose = Pose::interpolate(&self.start, &self.end, t);
        pose.p = add3(pose.p, self.offset);
        self.current = pose;
        self.applied_offset = self.offset;
        if let Some(spatializer) = self.spatializer.as_mut() {
            spatializer.update(&self.current);
        }
    }

    #[inline]
    pub fn has_spatializer(&self) -> bool {
        self.spatializer.is_some()
    }

    /// Attach a spatializer, disposing any previously attached one first.
    pub fn set_spatializer(&mut self, spatializer: Option<Box<dyn Spatializer>>) {
        if let Some(previous) = self.spatializer.take() {
            dispose_spatializer(previous);
        }
        self.spatializer = spatializer;
    }

    /// Detach the spatializer without disposing it.
    pub fn take_spatializer(&mut self) -> Option<Box<dyn Spatializer>> {
        self.spatializer.take()
    }

    /// Dispose and release the attached spatializer, if any.
    pub fn dispose(&mut self) {
        self.set_spatializer(None);
    }
}

impl Drop for PoseInterpolator {
    fn drop(&mut self) {
        self.dispose();
    }
}
