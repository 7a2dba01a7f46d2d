//! Lyon-backed [`Surface`] that tessellates draw calls into triangles.
//!
//! Produces a flat vertex buffer (triangle list, 6 floats per vertex) for a
//! GPU host. Gradients are approximated by concentric discs and dashes by
//! splitting the segment. Text cannot be tessellated, so labels are
//! collected separately for the host to overlay.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use super::surface::{RadialGradient, Shadow, Stroke, Surface, TextAlign, TextStyle};
use crate::core::color::Rgb;

/// Discs used to approximate a radial gradient.
const GRADIENT_RINGS: usize = 6;

/// Per-vertex data: position plus straight RGBA. 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Text that the host should draw on top of the triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub at: Vec2,
    pub style: TextStyle,
}

impl TextLabel {
    /// Flat record for the host: `[x, y, size_px, r, g, b, bold, centered]`,
    /// color in `0..=1`, flags as `0.0`/`1.0`.
    pub fn layout(&self) -> [f32; 8] {
        let [r, g, b] = self.style.color.to_unit();
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        [
            self.at.x,
            self.at.y,
            self.style.size_px,
            r,
            g,
            b,
            flag(self.style.bold),
            flag(self.style.align == TextAlign::Center),
        ]
    }
}

#[derive(Clone, Copy)]
struct VertexColor([f32; 4]);

impl VertexColor {
    fn opaque(c: Rgb) -> Self {
        let [r, g, b] = c.to_unit();
        Self([r, g, b, 1.0])
    }

    fn vertex(self, x: f32, y: f32) -> VectorVertex {
        let [r, g, b, a] = self.0;
        VectorVertex { x, y, r, g, b, a }
    }
}

impl FillVertexConstructor<VectorVertex> for VertexColor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        self.vertex(vertex.position().x, vertex.position().y)
    }
}

impl StrokeVertexConstructor<VectorVertex> for VertexColor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        self.vertex(vertex.position().x, vertex.position().y)
    }
}

/// Tessellating surface. Cleared by the host at the start of each frame.
pub struct VectorSurface {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    labels: Vec<TextLabel>,
    scale: f32,
    dash: Vec<f32>,
    shadow: Option<Shadow>,
}

impl VectorSurface {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(16384 * VectorVertex::FLOATS),
            labels: Vec::new(),
            scale: 1.0,
            dash: Vec::new(),
            shadow: None,
        }
    }

    /// Drop this frame's triangles and labels.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.labels.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// Flat float buffer, `vertex_count() * 6` long.
    pub fn vertices(&self) -> &[f32] {
        &self.buffer
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    fn to_device(&self, p: Vec2) -> lyon::math::Point {
        point(p.x * self.scale, p.y * self.scale)
    }

    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn fill_path(&mut self, path: &Path, color: VertexColor) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(0.5),
            &mut BuffersBuilder::new(&mut self.geometry, color),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => log::debug!("vector surface: fill failed: {:?}", e),
        }
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: VertexColor) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(0.5).with_line_width(width * self.scale),
            &mut BuffersBuilder::new(&mut self.geometry, color),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => log::debug!("vector surface: stroke failed: {:?}", e),
        }
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: VertexColor) {
        if !(radius > 0.0) {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(self.to_device(center), radius * self.scale, Winding::Positive);
        let path = builder.build();
        self.fill_path(&path, color);
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        let mut builder = Path::builder();
        builder.begin(self.to_device(from));
        builder.line_to(self.to_device(to));
        builder.end(false);
        let path = builder.build();
        self.stroke_path(&path, stroke.width, VertexColor::opaque(stroke.color));
    }
}

impl Default for VectorSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Shortest dash period that still gets split; anything finer strokes solid.
pub const MIN_DASH_PERIOD: f32 = 0.5;

/// Split a segment into the "on" pieces of a dash pattern.
///
/// Negative entries count as zero. Patterns whose period is below
/// [`MIN_DASH_PERIOD`] (or not finite) yield the whole segment.
pub fn dash_segments(from: Vec2, to: Vec2, pattern: &[f32]) -> Vec<(Vec2, Vec2)> {
    let total = from.distance(to);
    let period: f32 = pattern.iter().map(|d| d.max(0.0)).sum();
    if !(period >= MIN_DASH_PERIOD) || !period.is_finite() || !(total > 0.0) || !total.is_finite() {
        return vec![(from, to)];
    }
    let dir = (to - from) / total;

    let mut pieces = Vec::new();
    let mut travelled = 0.0;
    let mut on = true;
    // each full cycle advances by `period`, so this ends after total / period cycles
    for dash in pattern.iter().cycle() {
        if travelled >= total {
            break;
        }
        let end = (travelled + dash.max(0.0)).min(total);
        if on && end > travelled {
            pieces.push((from + dir * travelled, from + dir * end));
        }
        travelled = end;
        on = !on;
    }
    pieces
}

impl Surface for VectorSurface {
    fn backend(&self) -> &'static str {
        "lyon"
    }

    fn set_transform_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn fill_rect(&mut self, origin: Vec2, width: f32, height: f32, color: Rgb) {
        let corners = [
            origin,
            origin + Vec2::new(width, 0.0),
            origin + Vec2::new(width, height),
            origin + Vec2::new(0.0, height),
        ];
        self.fill_polygon(&corners, color);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        if self.dash.is_empty() {
            self.stroke_segment(from, to, stroke);
            return;
        }
        for (a, b) in dash_segments(from, to, &self.dash.clone()) {
            self.stroke_segment(a, b, stroke);
        }
    }

    fn set_line_dash(&mut self, pattern: &[f32]) {
        self.dash = pattern.to_vec();
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.shadow = Some(*shadow);
    }

    fn clear_shadow(&mut self) {
        self.shadow = None;
    }

    fn fill_radial_circle(&mut self, center: Vec2, radius: f32, gradient: &RadialGradient) {
        if let Some(shadow) = self.shadow {
            let [r, g, b] = shadow.color.rgb.to_unit();
            let soft = VertexColor([r, g, b, shadow.color.alpha]);
            self.fill_disc(center + shadow.offset, radius + shadow.blur * 0.25, soft);
        }
        // outer ring first, each smaller disc drifting toward the highlight
        for i in 0..GRADIENT_RINGS {
            let t = i as f32 / GRADIENT_RINGS as f32;
            let ring_radius = radius * (1.0 - t);
            let ring_center = center + gradient.focus * t;
            let color = gradient.outer.mix(gradient.inner, t);
            self.fill_disc(ring_center, ring_radius, VertexColor::opaque(color));
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        let mut builder = Path::builder();
        builder.begin(self.to_device(points[0]));
        for p in &points[1..] {
            builder.line_to(self.to_device(*p));
        }
        builder.close();
        let path = builder.build();
        self.fill_path(&path, VertexColor::opaque(color));
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            at: at * self.scale,
            style: TextStyle {
                size_px: style.size_px * self.scale,
                ..*style
            },
        });
    }
}
