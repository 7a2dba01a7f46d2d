//! Frame loop for one mechanism diagram.

use crate::api::config::ViewConfig;
use crate::api::mechanism::Mechanism;
use crate::api::painter::Painter;
use crate::core::math::{Orientation, Projector};
use crate::core::viewport::{BackingSize, Viewport};
use crate::input::queue::{InputQueue, ViewEvent};
use crate::renderer::surface::Surface;

/// Owns a mechanism plus the view state around it (viewport, step, input).
///
/// The host calls [`render_frame`](Self::render_frame) once per animation
/// frame; everything drawn is recomputed from the rotation and the step.
pub struct MechanismView<M: Mechanism> {
    mechanism: M,
    config: ViewConfig,
    viewport: Viewport,
    input: InputQueue,
    step: usize,
    frame_count: u64,
}

impl<M: Mechanism> MechanismView<M> {
    pub fn new(mechanism: M) -> Self {
        let config = mechanism.config();
        let viewport = Viewport::default()
            .with_rotation(config.initial_rotation)
            .with_auto_rotate(config.auto_rotate);
        Self {
            mechanism,
            config,
            viewport,
            input: InputQueue::new(),
            step: 0,
            frame_count: 0,
        }
    }

    pub fn mechanism(&self) -> &M {
        &self.mechanism
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.mechanism.step_count()
    }

    pub fn step_title(&self) -> &str {
        self.mechanism.step_title(self.step)
    }

    fn last_step(&self) -> usize {
        self.mechanism.step_count().saturating_sub(1)
    }

    /// Jump to `step`, clamped to the last step.
    pub fn set_step(&mut self, step: usize) {
        let clamped = step.min(self.last_step());
        if clamped != step {
            log::debug!("view: step {} out of range, clamped to {}", step, clamped);
        }
        if clamped != self.step {
            log::debug!("view: step {} -> {}", self.step, clamped);
            self.step = clamped;
        }
    }

    /// Queue an event for the start of the next frame.
    pub fn push_input(&mut self, event: ViewEvent) {
        self.input.push(event);
    }

    /// Apply an event now.
    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::SetStep(step) => self.set_step(step),
            ViewEvent::NextStep => self.set_step(self.step.saturating_add(1)),
            ViewEvent::PrevStep => self.set_step(self.step.saturating_sub(1)),
            ViewEvent::SetAutoRotate(on) => self.viewport.set_auto_rotate(on),
            ViewEvent::ToggleAutoRotate => {
                self.viewport.toggle_auto_rotate();
            }
            ViewEvent::Rotate(delta) => self.viewport.rotate_by(delta),
            ViewEvent::ResetRotation => self.viewport.set_rotation(self.config.initial_rotation),
        }
    }

    /// Forward a container resize to the viewport. The caller resizes the
    /// backing store to the returned size.
    pub fn resize(&mut self, logical_width: f32, logical_height: f32, pixel_ratio: f32) -> BackingSize {
        let size = self.viewport.resize(logical_width, logical_height, pixel_ratio);
        log::debug!(
            "view: resized to {}x{} (backing {}x{} @{})",
            self.viewport.width(),
            self.viewport.height(),
            size.width,
            size.height,
            size.scale
        );
        size
    }

    /// Draw one frame onto `surface`, then advance the rotation.
    pub fn render_frame(&mut self, surface: &mut dyn Surface) {
        for event in self.input.drain() {
            self.apply(event);
        }

        surface.set_transform_scale(self.viewport.pixel_ratio());
        surface.fill_rect(
            glam::Vec2::ZERO,
            self.viewport.width(),
            self.viewport.height(),
            self.config.style.background,
        );

        let orientation = Orientation::new(self.viewport.rotation(), self.config.pitch);
        let sites = self.mechanism.sites(self.step, orientation);
        let projector = Projector::new(self.viewport.center(), self.config.style.depth_k);
        {
            let mut painter = Painter::new(surface, &self.config.style, projector);
            self.mechanism.draw(&sites, &mut painter);
        }

        self.viewport.advance(self.config.rotation_step);
        self.frame_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Rgb;
    use crate::core::math::Point3D;
    use crate::renderer::primitives::BondKind;
    use crate::renderer::recorder::{CommandRecorder, DrawCommand};
    use glam::Vec2;

    struct Diatomic;

    struct Pair {
        left: Point3D,
        right: Point3D,
        kind: BondKind,
    }

    impl Mechanism for Diatomic {
        type Sites = Pair;

        fn step_count(&self) -> usize {
            3
        }

        fn step_title(&self, step: usize) -> &str {
            ["single", "double", "broken"][step]
        }

        fn sites(&self, step: usize, orientation: Orientation) -> Pair {
            let kind = match step {
                0 => BondKind::Single,
                1 => BondKind::Double,
                _ => BondKind::Dashed,
            };
            Pair {
                left: orientation.place(Point3D::new(-40.0, 0.0, 0.0), Point3D::ZERO),
                right: orientation.place(Point3D::new(20.0, 0.0, 0.0), Point3D::ZERO),
                kind,
            }
        }

        fn draw(&self, sites: &Pair, painter: &mut Painter) {
            painter.bond(sites.left, sites.right, sites.kind);
            painter.atom(sites.left, Rgb::CARBON, "C");
            painter.atom(sites.right, Rgb::OXYGEN, "O");
        }
    }

    fn view() -> MechanismView<Diatomic> {
        let mut view = MechanismView::new(Diatomic);
        view.resize(200.0, 100.0, 1.0);
        view
    }

    #[test]
    fn first_frame_is_flat_and_centered() {
        let mut view = view();
        let mut rec = CommandRecorder::new();
        view.render_frame(&mut rec);

        assert!(matches!(rec.commands()[0], DrawCommand::Transform { scale } if scale == 1.0));
        assert!(matches!(
            rec.commands()[1],
            DrawCommand::Rect { width, height, .. } if width == 200.0 && height == 100.0
        ));
        let lines: Vec<_> = rec.lines().map(|(a, b, _)| (a, b)).collect();
        assert_eq!(lines, vec![(Vec2::new(60.0, 50.0), Vec2::new(120.0, 50.0))]);
    }

    #[test]
    fn rotation_advances_only_when_auto_rotating() {
        let mut view = view();
        let mut rec = CommandRecorder::new();
        view.render_frame(&mut rec);
        view.render_frame(&mut rec);
        assert!((view.viewport().rotation() - 0.012).abs() < 1e-6);

        view.push_input(ViewEvent::SetAutoRotate(false));
        view.render_frame(&mut rec);
        let paused = view.viewport().rotation();
        view.render_frame(&mut rec);
        assert_eq!(view.viewport().rotation(), paused);
        assert_eq!(view.frame_count(), 4);
    }

    #[test]
    fn queued_events_apply_at_frame_start() {
        let mut view = view();
        view.push_input(ViewEvent::NextStep);
        assert_eq!(view.step(), 0);

        let mut rec = CommandRecorder::new();
        view.render_frame(&mut rec);
        assert_eq!(view.step(), 1);
        assert_eq!(rec.lines().count(), 2);
    }

    #[test]
    fn step_requests_clamp() {
        let mut view = view();
        view.set_step(10);
        assert_eq!(view.step(), 2);
        assert_eq!(view.step_title(), "broken");

        view.apply(ViewEvent::NextStep);
        assert_eq!(view.step(), 2);

        view.apply(ViewEvent::SetStep(0));
        view.apply(ViewEvent::PrevStep);
        assert_eq!(view.step(), 0);
    }

    #[test]
    fn manual_rotation_and_reset() {
        let mut view = view();
        view.apply(ViewEvent::SetAutoRotate(false));
        view.apply(ViewEvent::Rotate(0.5));
        assert_eq!(view.viewport().rotation(), 0.5);
        view.apply(ViewEvent::ResetRotation);
        assert_eq!(view.viewport().rotation(), 0.0);
        view.apply(ViewEvent::ToggleAutoRotate);
        assert!(view.viewport().auto_rotate());
    }

    #[test]
    fn dashed_step_leaves_solid_dash() {
        let mut view = view();
        view.set_step(2);
        let mut rec = CommandRecorder::new();
        view.render_frame(&mut rec);
        assert!(rec.line_dash().is_empty());
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn frames_tessellate_for_gpu_hosts() {
        use crate::renderer::vector_surface::{VectorSurface, VectorVertex};

        let mut view = view();
        view.resize(200.0, 100.0, 2.0);
        let mut surface = VectorSurface::new();
        view.render_frame(&mut surface);

        // background quad plus bond and atom geometry
        assert!(surface.vertex_count() > 6);
        assert!(surface.vertices().iter().all(|v| v.is_finite()));
        let max_x = surface
            .vertices()
            .chunks(VectorVertex::FLOATS)
            .map(|v| v[0])
            .fold(f32::MIN, f32::max);
        assert!((max_x - 400.0).abs() < 1e-3);

        let labels: Vec<&str> = surface.labels().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(labels, ["C", "O"]);

        surface.clear();
        view.render_frame(&mut surface);
        assert_eq!(surface.labels().len(), 2);
    }
}
