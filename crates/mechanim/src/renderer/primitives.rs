//! Atom, bond and arrow primitives.
//!
//! These draw one element each and keep no state between calls. Callers
//! are responsible for drawing all bonds of a molecule before its atoms so
//! the atom glyphs cover the bond ends; [`crate::api::painter::Molecule`]
//! does that ordering for you.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::style::RenderStyle;
use super::surface::{RadialGradient, Shadow, Stroke, Surface, TextAlign, TextStyle};
use crate::core::color::Rgb;
use crate::core::math::{Point3D, Projector};

/// Segments shorter than this (in pixels) have no usable direction.
pub const MIN_SEGMENT_PX: f32 = 1e-6;

/// Number of straight pieces used to approximate a curved arrow.
const CURVE_SEGMENTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BondKind {
    #[default]
    Single,
    Double,
    Triple,
    /// Partial bond (forming or breaking).
    Dashed,
}

/// Perpendicular offset for parallel strokes of a bond from `a` to `b`.
///
/// Returns `None` when the segment is too short to have a direction.
pub fn bond_offset(a: Vec2, b: Vec2, distance: f32) -> Option<Vec2> {
    let dir = b - a;
    let len = dir.length();
    // negated comparison also rejects NaN
    if !(len > MIN_SEGMENT_PX) {
        return None;
    }
    Some(Vec2::new(-dir.y, dir.x) / len * distance)
}

/// Draw a bond between two diagram points.
///
/// Each endpoint is projected with its own depth. `color` overrides the
/// style's bond color.
pub fn draw_bond<S: Surface + ?Sized>(
    surface: &mut S,
    projector: &Projector,
    style: &RenderStyle,
    a: Point3D,
    b: Point3D,
    kind: BondKind,
    color: Option<Rgb>,
) {
    let pa = projector.project(a).pos;
    let pb = projector.project(b).pos;
    let stroke = Stroke::new(color.unwrap_or(style.bond_color), style.bond_width);

    match kind {
        BondKind::Single => surface.stroke_line(pa, pb, &stroke),
        BondKind::Dashed => {
            surface.set_line_dash(&style.dash_pattern);
            surface.stroke_line(pa, pb, &stroke);
            surface.set_line_dash(&[]);
        }
        BondKind::Double => match bond_offset(pa, pb, style.double_bond_offset) {
            Some(off) => {
                surface.stroke_line(pa + off, pb + off, &stroke);
                surface.stroke_line(pa - off, pb - off, &stroke);
            }
            None => surface.stroke_line(pa, pb, &stroke),
        },
        BondKind::Triple => {
            surface.stroke_line(pa, pb, &stroke);
            if let Some(off) = bond_offset(pa, pb, style.double_bond_offset * 1.5) {
                surface.stroke_line(pa + off, pb + off, &stroke);
                surface.stroke_line(pa - off, pb - off, &stroke);
            }
        }
    }
}

/// Draw a shaded atom glyph with a centered label.
///
/// The radius and label size shrink with depth. An empty label draws no text.
pub fn draw_atom<S: Surface + ?Sized>(
    surface: &mut S,
    projector: &Projector,
    style: &RenderStyle,
    at: Point3D,
    color: Rgb,
    label: &str,
    size: f32,
) {
    let proj = projector.project(at);
    let radius = size * proj.scale;
    if !(radius > 0.0) {
        return;
    }

    let shadow = Shadow {
        color: style.shadow.color,
        blur: style.shadow.blur * proj.scale,
        offset: Vec2::new(style.shadow.offset_x, style.shadow.offset_y) * proj.scale,
    };
    let gradient = RadialGradient {
        focus: Vec2::splat(-radius * style.highlight_offset),
        inner: color.shade(style.core_shade),
        outer: color.shade(style.rim_shade),
    };

    surface.set_shadow(&shadow);
    surface.fill_radial_circle(proj.pos, radius, &gradient);
    surface.clear_shadow();

    if !label.is_empty() {
        let text = TextStyle {
            color: style.label_color,
            size_px: radius * style.label_ratio,
            bold: true,
            align: TextAlign::Center,
        };
        surface.fill_text(label, proj.pos, &text);
    }
}

/// Triangle for an arrow head with its tip at `tip`, pointing along `angle`.
pub fn arrow_head(tip: Vec2, angle: f32, length: f32) -> [Vec2; 3] {
    let wing = |a: f32| tip - Vec2::new(a.cos(), a.sin()) * length;
    [tip, wing(angle - PI / 6.0), wing(angle + PI / 6.0)]
}

/// Straight arrow in screen space. Zero-length arrows are skipped.
pub fn draw_arrow<S: Surface + ?Sized>(surface: &mut S, style: &RenderStyle, from: Vec2, to: Vec2, color: Rgb) {
    let dir = to - from;
    if !(dir.length() > MIN_SEGMENT_PX) {
        return;
    }
    surface.stroke_line(from, to, &Stroke::new(color, style.arrow_width));
    surface.fill_polygon(&arrow_head(to, dir.y.atan2(dir.x), style.arrow_head), color);
}

/// Curved (electron-pushing) arrow in screen space.
///
/// `bend` moves the quadratic control point off the chord by that fraction
/// of the chord length; positive bends to the left of the travel direction.
pub fn draw_curved_arrow<S: Surface + ?Sized>(
    surface: &mut S,
    style: &RenderStyle,
    from: Vec2,
    to: Vec2,
    bend: f32,
    color: Rgb,
) {
    let dir = to - from;
    let len = dir.length();
    if !(len > MIN_SEGMENT_PX) {
        return;
    }
    if bend == 0.0 {
        draw_arrow(surface, style, from, to, color);
        return;
    }

    let normal = Vec2::new(dir.y, -dir.x) / len;
    let control = (from + to) * 0.5 + normal * bend * len;
    let stroke = Stroke::new(color, style.arrow_width);

    let mut prev = from;
    for i in 1..=CURVE_SEGMENTS {
        let t = i as f32 / CURVE_SEGMENTS as f32;
        let u = 1.0 - t;
        let next = from * (u * u) + control * (2.0 * u * t) + to * (t * t);
        surface.stroke_line(prev, next, &stroke);
        prev = next;
    }

    let tangent = to - control;
    surface.fill_polygon(&arrow_head(to, tangent.y.atan2(tangent.x), style.arrow_head), color);
}
