//! Basic vector math helper functions.
//!
//! Thin wrappers over `glam` that pin down the edge cases the decision engine
//! relies on: normalising the zero vector, planar lengths and the conversion
//! between direction vectors and view angles.
//!
//! Angles follow one convention throughout the crate: yaw is measured in
//! degrees counter-clockwise from `+x` in the horizontal plane, and pitch in
//! degrees above the horizon.
use glam::{Vec2, Vec3};

/// Yaw and pitch in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewAngles {
    /// Degrees above the horizon.
    pub pitch: f32,
    /// Degrees counter-clockwise from `+x`.
    pub yaw: f32,
}

impl ViewAngles {
    /// Build angles from pitch and yaw in degrees.
    #[must_use]
    pub const fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    /// Unit vector pointing along these angles.
    #[must_use]
    pub fn forward(self) -> Vec3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        Vec3::new(cp * cy, cp * sy, sp)
    }

    /// Component-wise wrapped difference `target - self`, each in `(-180, 180]`.
    #[must_use]
    pub fn delta_to(self, target: Self) -> Self {
        Self {
            pitch: wrap_degrees(target.pitch - self.pitch),
            yaw: wrap_degrees(target.yaw - self.yaw),
        }
    }

    /// Returns these angles with yaw wrapped and pitch clamped to `[-89, 89]`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            pitch: self.pitch.clamp(-89.0, 89.0),
            yaw: wrap_degrees(self.yaw),
        }
    }
}

/// Wrap an angle in degrees into `(-180, 180]`.
///
/// # Examples
/// ```
/// use fortbot::vector_math::wrap_degrees;
/// assert!((wrap_degrees(270.0) + 90.0).abs() < 1e-4);
/// assert!((wrap_degrees(-180.0) - 180.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Returns the unit vector along `v`, or `+z` when `v` has zero length.
///
/// Non-finite components propagate rather than being trapped.
///
/// # Examples
/// ```
/// use fortbot::vector_math::normalize;
/// use glam::Vec3;
/// assert_eq!(normalize(Vec3::ZERO), Vec3::Z);
/// let n = normalize(Vec3::new(3.0, 0.0, 4.0));
/// assert!((n.x - 0.6).abs() < 1e-6);
/// ```
#[must_use]
pub fn normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len == 0.0 {
        return Vec3::Z;
    }
    v * len.recip()
}

/// Returns the unit vector along a planar `v`, or zero when `v` has zero length.
#[must_use]
pub fn normalize_2d(v: Vec2) -> Vec2 {
    let len = v.length();
    if len == 0.0 {
        return Vec2::ZERO;
    }
    v * len.recip()
}

/// Length of the horizontal projection of `v`.
#[must_use]
pub fn length_2d(v: Vec3) -> f32 {
    v.truncate().length()
}

/// Dot product of two vectors.
#[must_use]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.dot(b)
}

/// Cross product of two vectors.
#[must_use]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b)
}

/// Angle between two vectors in degrees, in `[0, 180]`.
///
/// Returns `0` when either vector has zero length.
#[must_use]
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let denom = a.length() * b.length();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// View angles pointing along `direction`.
///
/// The zero vector maps to level angles facing `+x`.
#[must_use]
pub fn vec_to_angles(direction: Vec3) -> ViewAngles {
    let planar = length_2d(direction);
    if planar == 0.0 && direction.z == 0.0 {
        return ViewAngles::default();
    }
    let yaw = if planar == 0.0 {
        0.0
    } else {
        direction.y.atan2(direction.x).to_degrees()
    };
    let pitch = direction.z.atan2(planar).to_degrees();
    ViewAngles { pitch, yaw }
}
