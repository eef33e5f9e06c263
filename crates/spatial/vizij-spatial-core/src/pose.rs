//! Timestamped rigid placement (position + forward/up orientation).

use serde::{Deserialize, Serialize};

use crate::vector::{lerp_vec3, normalize3, Vec3};

/// A position and orientation at a point in time.
///
/// `f` and `u` are kept at unit length by every setter on this type. They are
/// not forced to be orthogonal.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Timestamp in seconds.
    pub t: f32,
    /// Position.
    pub p: Vec3,
    /// Forward direction.
    pub f: Vec3,
    /// Up direction.
    pub u: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            t: 0.0,
            p: [0.0, 0.0, 0.0],
            f: [0.0, 0.0, -1.0],
            u: [0.0, 1.0, 0.0],
        }
    }
}

impl Pose {
    pub fn new(t: f32, p: Vec3, f: Vec3, u: Vec3) -> Self {
        let mut pose = Self {
            t,
            p,
            ..Self::default()
        };
        pose.set_orientation(f, u);
        pose
    }

    #[inline]
    pub fn set_position(&mut self, p: Vec3) {
        self.p = p;
    }

    /// Set forward/up, normalizing both.
    #[inline]
    pub fn set_orientation(&mut self, f: Vec3, u: Vec3) {
        self.f = normalize3(f);
        self.u = normalize3(u);
    }

    /// Blend `start` → `end` at time `t`.
    ///
    /// Outside `(start.t, end.t)` the nearest endpoint is returned verbatim,
    /// which also covers degenerate segments where `start.t == end.t`.
    /// Inside, position is lerped and the orientation vectors are lerped then
    /// renormalized (NLERP).
    pub fn interpolate(start: &Pose, end: &Pose, t: f32) -> Pose {
        if t <= start.t {
            return *start;
        }
        if t >= end.t {
            return *end;
        }
        let k = (t - start.t) / (end.t - start.t);
        Pose {
            t,
            p: lerp_vec3(start.p, end.p, k),
            f: normalize3(lerp_vec3(start.f, end.f, k)),
            u: normalize3(lerp_vec3(start.u, end.u, k)),
        }
    }
}
