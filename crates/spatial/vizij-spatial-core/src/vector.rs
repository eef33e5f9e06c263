//! Small 3-vector helpers used by pose math.

/// Plain `[x, y, z]` vector.
pub type Vec3 = [f32; 3];

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
pub fn add3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn dot3(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn length3(v: Vec3) -> f32 {
    dot3(v, v).sqrt()
}

/// Scale `v` to unit length. Zero vectors are returned unchanged.
#[inline]
pub fn normalize3(mut v: Vec3) -> Vec3 {
    let len2 = dot3(v, v);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        v[0] *= inv_len;
        v[1] *= inv_len;
        v[2] *= inv_len;
    }
    v
}
