use serde::{Deserialize, Serialize};

use crate::core::color::{Rgb, Rgba};

/// Tunable drawing constants shared by every primitive.
///
/// Every field has a default, so a JSON config only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Depth attenuation `k` in `scale = 1 / (1 + z * k)`.
    ///
    /// Layouts are authored for |z| up to about 150 units; 0.0008 gives a
    /// depth cue of roughly ±12% over that range.
    pub depth_k: f32,
    /// Surface clear color, repainted every frame.
    pub background: Rgb,

    pub bond_color: Rgb,
    pub bond_width: f32,
    /// Pixel distance of each double-bond stroke from the bond axis.
    pub double_bond_offset: f32,
    /// Dash pattern for partial (forming/breaking) bonds.
    pub dash_pattern: Vec<f32>,

    /// Atom glyph radius at unit scale.
    pub atom_size: f32,
    /// Shade applied to the gradient core (0 keeps the base color).
    pub core_shade: f32,
    /// Darkening applied to the gradient rim (negative).
    pub rim_shade: f32,
    /// Highlight position as a fraction of the radius, toward the upper left.
    pub highlight_offset: f32,
    pub label_color: Rgb,
    /// Label font size as a fraction of the on-screen atom radius.
    pub label_ratio: f32,
    pub shadow: ShadowStyle,

    pub arrow_color: Rgb,
    pub arrow_width: f32,
    pub arrow_head: f32,

    pub caption_color: Rgb,
    pub caption_font_px: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowStyle {
    pub color: Rgba,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            color: Rgba::new(Rgb::BLACK, 0.35),
            blur: 8.0,
            offset_x: 2.0,
            offset_y: 3.0,
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            depth_k: 0.0008,
            background: Rgb::new(0x0f, 0x17, 0x2a),
            bond_color: Rgb::BOND_GRAY,
            bond_width: 3.0,
            double_bond_offset: 4.5,
            dash_pattern: vec![5.0, 5.0],
            atom_size: 18.0,
            core_shade: 0.0,
            rim_shade: -30.0,
            highlight_offset: 0.3,
            label_color: Rgb::WHITE,
            label_ratio: 0.75,
            shadow: ShadowStyle::default(),
            arrow_color: Rgb::new(0xf5, 0x9e, 0x0b),
            arrow_width: 2.0,
            arrow_head: 10.0,
            caption_color: Rgb::new(0xe2, 0xe8, 0xf0),
            caption_font_px: 14.0,
        }
    }
}
