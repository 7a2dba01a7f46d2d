use glam::Vec2;

/// Backing-store size for a drawable surface after a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackingSize {
    /// Device pixels wide.
    pub width: u32,
    /// Device pixels high.
    pub height: u32,
    /// Uniform transform the surface must be reset to so drawing stays in logical units.
    pub scale: f32,
}

/// Per-view surface dimensions and rotation state.
///
/// The rotation angle is the only geometric state that survives between
/// frames. Everything drawn is recomputed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    pixel_ratio: f32,
    rotation: f32,
    auto_rotate: bool,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
            rotation: 0.0,
            auto_rotate: true,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_auto_rotate(mut self, auto_rotate: bool) -> Self {
        self.auto_rotate = auto_rotate;
        self
    }

    /// Re-measure the container and compute the backing-store size.
    ///
    /// Non-positive or non-finite sizes are ignored (the last good size is
    /// kept), and a bad pixel ratio falls back to 1. Calling this repeatedly
    /// with the same inputs always yields the same result.
    pub fn resize(&mut self, logical_width: f32, logical_height: f32, pixel_ratio: f32) -> BackingSize {
        if logical_width.is_finite() && logical_width > 0.0 && logical_height.is_finite() && logical_height > 0.0 {
            self.width = logical_width;
            self.height = logical_height;
        } else {
            log::debug!(
                "viewport: ignoring degenerate container size {}x{}",
                logical_width,
                logical_height
            );
        }
        self.pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        self.backing_size()
    }

    pub fn backing_size(&self) -> BackingSize {
        BackingSize {
            width: (self.width * self.pixel_ratio).round() as u32,
            height: (self.height * self.pixel_ratio).round() as u32,
            scale: self.pixel_ratio,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Logical center of the surface.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Takes effect on the next advance; nothing is redrawn here.
    pub fn set_auto_rotate(&mut self, auto_rotate: bool) {
        self.auto_rotate = auto_rotate;
    }

    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        self.auto_rotate
    }

    /// Advance the rotation by `increment` if auto-rotate is on.
    pub fn advance(&mut self, increment: f32) {
        if self.auto_rotate {
            self.rotation += increment;
        }
    }

    /// Manual rotation (e.g. a drag), applied whether or not auto-rotate is on.
    pub fn rotate_by(&mut self, delta: f32) {
        if delta.is_finite() {
            self.rotation += delta;
        }
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        if rotation.is_finite() {
            self.rotation = rotation;
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_scales_backing_store() {
        let mut vp = Viewport::default();
        let size = vp.resize(640.0, 360.0, 2.0);
        assert_eq!(size, BackingSize { width: 1280, height: 720, scale: 2.0 });
        assert_eq!(vp.width(), 640.0);
        assert_eq!(vp.center(), Vec2::new(320.0, 180.0));
    }

    #[test]
    fn resize_is_idempotent() {
        let mut vp = Viewport::default();
        let first = vp.resize(501.0, 333.0, 1.5);
        let second = vp.resize(501.0, 333.0, 1.5);
        assert_eq!(first, second);
        assert_eq!(first.width, 752);
        assert_eq!(first.height, 500);
    }

    #[test]
    fn resize_ignores_degenerate_sizes() {
        let mut vp = Viewport::new(300.0, 200.0);
        let size = vp.resize(0.0, f32::NAN, 0.0);
        assert_eq!(vp.width(), 300.0);
        assert_eq!(vp.height(), 200.0);
        assert_eq!(size.scale, 1.0);
    }

    #[test]
    fn advance_respects_auto_rotate() {
        let mut vp = Viewport::default();
        vp.advance(0.005);
        vp.advance(0.005);
        assert!((vp.rotation() - 0.01).abs() < 1e-6);

        vp.set_auto_rotate(false);
        vp.advance(0.005);
        assert!((vp.rotation() - 0.01).abs() < 1e-6);

        assert!(vp.toggle_auto_rotate());
        vp.advance(0.005);
        assert!((vp.rotation() - 0.015).abs() < 1e-6);
    }

    #[test]
    fn manual_rotation_ignores_flag() {
        let mut vp = Viewport::default().with_auto_rotate(false);
        vp.rotate_by(0.25);
        vp.rotate_by(f32::INFINITY);
        assert_eq!(vp.rotation(), 0.25);
    }
}
