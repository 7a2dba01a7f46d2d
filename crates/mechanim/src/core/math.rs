//! Pseudo-3D math for mechanism diagrams.
//!
//! Points live in an abstract unit space. They are rotated by a yaw/pitch pair
//! and then projected with a cheap depth scale `1 / (1 + z * k)` instead of a
//! camera matrix.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Smallest allowed value of `1 + z * k` in [`depth_scale`].
///
/// Points pushed past `z = -1/k` would otherwise blow up or flip the scale.
pub const MIN_DEPTH_DENOM: f32 = 0.05;

/// A point (or offset) in diagram space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Rotate around the Y axis (yaw).
    pub fn rotate_y(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }

    /// Rotate around the X axis (pitch).
    pub fn rotate_x(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x,
            y: self.y * cos - self.z * sin,
            z: self.y * sin + self.z * cos,
        }
    }

    /// Drop the depth component.
    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Point3D {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3D> for [f32; 3] {
    fn from(p: Point3D) -> Self {
        [p.x, p.y, p.z]
    }
}

impl Add for Point3D {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Point3D {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Point3D {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Rotate `p` by yaw (`angle_y`) first, then by pitch (`angle_x`).
pub fn rotate3d(p: Point3D, angle_x: f32, angle_y: f32) -> Point3D {
    p.rotate_y(angle_y).rotate_x(angle_x)
}

/// Yaw/pitch pair applied to every site of a step.
///
/// Yaw comes from the live viewport rotation; pitch is a fixed tilt from
/// the view config (zero for most diagrams).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    pub fn yaw(yaw: f32) -> Self {
        Self { yaw, pitch: 0.0 }
    }

    /// Rotate a base offset and translate it to `origin`.
    pub fn place(self, offset: Point3D, origin: Point3D) -> Point3D {
        rotate3d(offset, self.pitch, self.yaw) + origin
    }
}

/// Depth scale `1 / (1 + z * k)`, with the denominator clamped to
/// [`MIN_DEPTH_DENOM`] so the result is always finite and positive.
#[inline]
pub fn depth_scale(z: f32, k: f32) -> f32 {
    1.0 / (1.0 + z * k).max(MIN_DEPTH_DENOM)
}

/// Result of projecting a diagram point onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Logical screen position.
    pub pos: Vec2,
    /// Depth of the rotated point (larger = farther).
    pub depth: f32,
    /// Size multiplier for glyphs drawn at this depth.
    pub scale: f32,
}

/// Maps diagram points to logical screen coordinates around a center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub center: Vec2,
    /// Depth attenuation constant `k` (typically 0.0008 to 0.001).
    pub depth_k: f32,
}

impl Projector {
    pub fn new(center: Vec2, depth_k: f32) -> Self {
        Self { center, depth_k }
    }

    pub fn project(&self, p: Point3D) -> Projection {
        let scale = depth_scale(p.z, self.depth_k);
        Projection {
            pos: self.center + p.xy() * scale,
            depth: p.z,
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const SAMPLE_POINTS: [Point3D; 5] = [
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(-40.0, 12.0, 7.5),
        Point3D::new(0.0, -65.0, 30.0),
        Point3D::new(120.0, 80.0, -150.0),
        Point3D::new(-3.25, 0.5, 99.0),
    ];

    const SAMPLE_ANGLES: [f32; 6] = [0.0, 0.006, 0.7, FRAC_PI_2, PI, -2.4];

    fn close(a: Point3D, b: Point3D, tol: f32) -> bool {
        a.distance(b) < tol
    }

    #[test]
    fn rotate_y_quarter_turn() {
        let rotated = Point3D::new(1.0, 0.0, 0.0).rotate_y(FRAC_PI_2);
        assert!(rotated.x.abs() < 1e-6);
        assert!((rotated.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_preserves_length() {
        for p in SAMPLE_POINTS {
            for theta in SAMPLE_ANGLES {
                let r = rotate3d(p, 0.0, theta);
                let tol = 1e-4 * p.length().max(1.0);
                assert!(
                    (r.length() - p.length()).abs() < tol,
                    "|{:?}| changed under yaw {}",
                    p,
                    theta
                );
                let tilted = rotate3d(p, theta, 0.3);
                assert!((tilted.length() - p.length()).abs() < tol);
            }
        }
    }

    #[test]
    fn rotation_composes() {
        for p in SAMPLE_POINTS {
            for a in SAMPLE_ANGLES {
                for b in SAMPLE_ANGLES {
                    let twice = rotate3d(rotate3d(p, 0.0, a), 0.0, b);
                    let once = rotate3d(p, 0.0, a + b);
                    assert!(close(twice, once, 1e-3 * p.length().max(1.0)));
                }
            }
        }
    }

    #[test]
    fn yaw_then_pitch_order() {
        let p = Point3D::new(1.0, 0.0, 0.0);
        let r = rotate3d(p, FRAC_PI_2, FRAC_PI_2);
        // yaw sends +x to -z, pitch then sends -z to +y
        assert!(close(r, Point3D::new(0.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn depth_scale_is_monotonic() {
        let k = 0.0008;
        let depths = [-900.0, -150.0, -20.0, 0.0, 0.5, 40.0, 150.0, 2000.0];
        for pair in depths.windows(2) {
            assert!(depth_scale(pair[1], k) < depth_scale(pair[0], k));
        }
        assert_eq!(depth_scale(0.0, k), 1.0);
    }

    #[test]
    fn depth_scale_never_singular() {
        let k = 0.001;
        for z in [-1000.0, -1000.0001, -5000.0, f32::MIN / 2.0] {
            let s = depth_scale(z, k);
            assert!(s.is_finite() && s > 0.0, "scale {} at z {}", s, z);
            assert!(s <= 1.0 / MIN_DEPTH_DENOM);
        }
    }

    #[test]
    fn project_flat_points_at_unit_scale() {
        let projector = Projector::new(Vec2::ZERO, 0.0008);
        let a = projector.project(rotate3d(Point3D::new(-40.0, 0.0, 0.0), 0.0, 0.0));
        let b = projector.project(rotate3d(Point3D::new(20.0, 0.0, 0.0), 0.0, 0.0));
        assert_eq!(a.scale, 1.0);
        assert_eq!(b.scale, 1.0);
        assert_eq!(a.pos, Vec2::new(-40.0, 0.0));
        assert_eq!(b.pos, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn project_offsets_from_center() {
        let projector = Projector::new(Vec2::new(400.0, 300.0), 0.001);
        let proj = projector.project(Point3D::new(10.0, -20.0, 0.0));
        assert_eq!(proj.pos, Vec2::new(410.0, 280.0));

        let far = projector.project(Point3D::new(100.0, 0.0, 100.0));
        assert!(far.pos.x < 500.0);
        assert!(far.scale < 1.0);
    }

    #[test]
    fn orientation_place_translates_after_rotating() {
        let origin = Point3D::new(5.0, 5.0, 0.0);
        let placed = Orientation::yaw(PI).place(Point3D::new(10.0, 0.0, 0.0), origin);
        assert!(close(placed, Point3D::new(-5.0, 5.0, 0.0), 1e-4));
    }

    #[test]
    fn point_deserializes_from_triple() {
        let p: Point3D = serde_json::from_str("[1.5, -2, 3]").unwrap();
        assert_eq!(p, Point3D::new(1.5, -2.0, 3.0));
    }
}
