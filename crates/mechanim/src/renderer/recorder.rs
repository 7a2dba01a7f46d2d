use glam::Vec2;

use super::surface::{RadialGradient, Shadow, Stroke, Surface, TextStyle};
use crate::core::color::Rgb;

/// A single recorded draw call, with the state it was drawn under.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Transform { scale: f32 },
    Rect { origin: Vec2, width: f32, height: f32, color: Rgb },
    Line { from: Vec2, to: Vec2, stroke: Stroke, dash: Vec<f32> },
    Circle { center: Vec2, radius: f32, gradient: RadialGradient, shadow: Option<Shadow> },
    Polygon { points: Vec<Vec2>, color: Rgb },
    Text { text: String, at: Vec2, style: TextStyle },
}

/// Headless surface that records draw calls instead of painting.
///
/// Used by tests and by hosts that replay frames onto their own backend.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    dash: Vec<f32>,
    shadow: Option<Shadow>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop recorded commands. Dash and shadow state are kept, as on a canvas.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Dash pattern currently in effect.
    pub fn line_dash(&self) -> &[f32] {
        &self.dash
    }

    pub fn shadow(&self) -> Option<&Shadow> {
        self.shadow.as_ref()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, &[f32])> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { from, to, dash, .. } => Some((*from, *to, dash.as_slice())),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle { center, radius, .. } => Some((*center, *radius)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for CommandRecorder {
    fn backend(&self) -> &'static str {
        "recorder"
    }

    fn set_transform_scale(&mut self, scale: f32) {
        self.commands.push(DrawCommand::Transform { scale });
    }

    fn fill_rect(&mut self, origin: Vec2, width: f32, height: f32, color: Rgb) {
        self.commands.push(DrawCommand::Rect { origin, width, height, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            stroke: *stroke,
            dash: self.dash.clone(),
        });
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
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            gradient: *gradient,
            shadow: self.shadow,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        self.commands.push(DrawCommand::Polygon { points: points.to_vec(), color });
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            style: *style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_capture_dash_state() {
        let mut rec = CommandRecorder::new();
        let stroke = Stroke::new(Rgb::BOND_GRAY, 2.0);
        rec.set_line_dash(&[4.0, 4.0]);
        rec.stroke_line(Vec2::ZERO, Vec2::X, &stroke);
        rec.set_line_dash(&[]);
        rec.stroke_line(Vec2::ZERO, Vec2::Y, &stroke);

        let dashes: Vec<&[f32]> = rec.lines().map(|(_, _, d)| d).collect();
        let solid: &[f32] = &[];
        assert_eq!(dashes, vec![&[4.0, 4.0][..], solid]);
    }

    #[test]
    fn degenerate_polygon_is_skipped() {
        let mut rec = CommandRecorder::new();
        rec.fill_polygon(&[Vec2::ZERO, Vec2::ONE], Rgb::BLACK);
        assert!(rec.is_empty());
    }

    #[test]
    fn clear_keeps_state() {
        let mut rec = CommandRecorder::new();
        rec.set_line_dash(&[2.0]);
        rec.fill_rect(Vec2::ZERO, 10.0, 10.0, Rgb::BLACK);
        rec.clear();
        assert!(rec.is_empty());
        assert_eq!(rec.line_dash(), &[2.0]);
    }
}
