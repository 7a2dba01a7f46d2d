//! Drawing-surface contract.
//!
//! The primitives only need a small slice of the Canvas 2D API. This trait
//! names that slice so the same drawing code runs against a browser canvas
//! (`mechanim-web`), a lyon tessellator ([`super::vector_surface`]) or a
//! headless recorder ([`super::recorder`]).
//!
//! All coordinates are logical pixels. Implementations map them to device
//! pixels through the transform set by [`Surface::set_transform_scale`].

use glam::Vec2;

use crate::core::color::{Rgb, Rgba};

/// Line stroke parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
}

impl Stroke {
    pub fn new(color: Rgb, width: f32) -> Self {
        Self { color, width }
    }
}

/// Drop shadow applied to fills until cleared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f32,
    pub offset: Vec2,
}

/// Two-stop radial gradient filling a disc.
///
/// The light `inner` stop sits at `center + focus` with radius zero and the
/// `outer` stop at the disc rim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub focus: Vec2,
    pub inner: Rgb,
    pub outer: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Center,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgb,
    pub size_px: f32,
    pub bold: bool,
    pub align: TextAlign,
}

impl TextStyle {
    /// CSS font shorthand, e.g. `bold 14px sans-serif`.
    pub fn css_font(&self) -> String {
        let weight = if self.bold { "bold " } else { "" };
        format!("{}{:.1}px sans-serif", weight, self.size_px.max(1.0))
    }
}

/// The Canvas-2D subset the primitives draw with.
pub trait Surface {
    /// Backend identifier (e.g. "canvas2d", "lyon", "recorder").
    fn backend(&self) -> &'static str;

    /// Reset the transform to a uniform scale (the device pixel ratio).
    fn set_transform_scale(&mut self, scale: f32);

    fn fill_rect(&mut self, origin: Vec2, width: f32, height: f32, color: Rgb);

    /// Stroke a straight segment using the current dash pattern.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);

    /// Set the dash pattern for later strokes. An empty slice means solid.
    fn set_line_dash(&mut self, pattern: &[f32]);

    fn set_shadow(&mut self, shadow: &Shadow);

    fn clear_shadow(&mut self);

    fn fill_radial_circle(&mut self, center: Vec2, radius: f32, gradient: &RadialGradient);

    /// Fill a closed polygon. Fewer than three points draws nothing.
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb);

    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_font_shorthand() {
        let style = TextStyle {
            color: Rgb::WHITE,
            size_px: 13.5,
            bold: true,
            align: TextAlign::Center,
        };
        assert_eq!(style.css_font(), "bold 13.5px sans-serif");

        let tiny = TextStyle { size_px: 0.2, bold: false, ..style };
        assert_eq!(tiny.css_font(), "1.0px sans-serif");
    }
}
