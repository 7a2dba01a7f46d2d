#[cfg(feature = "vectors")]
use mechanim::renderer::VectorSurface;
use mechanim::{BackingSize, Mechanism, MechanismView};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement, Window};

use crate::canvas::CanvasSurface;

/// What a runner draws into each frame.
enum Target {
    /// The canvas's own 2D context.
    Canvas(CanvasSurface),
    /// Triangles for a GPU host that owns the canvas; labels are overlaid
    /// by the host.
    #[cfg(feature = "vectors")]
    Vectors(VectorSurface),
}

/// Generic view runner that ties a [`MechanismView`] to one canvas.
///
/// Each concrete mechanism crate keeps a `thread_local!` mount holding a
/// runner and exports free functions via `#[wasm_bindgen]`, because
/// wasm-bindgen cannot export generic structs directly.
pub struct ViewRunner<M: Mechanism> {
    view: MechanismView<M>,
    window: Window,
    canvas: HtmlCanvasElement,
    target: Option<Target>,
}

impl<M: Mechanism> ViewRunner<M> {
    /// Runner drawing through the canvas's 2D context.
    pub fn new(mechanism: M, window: Window, canvas: HtmlCanvasElement) -> Self {
        let target = CanvasSurface::from_canvas(&canvas).map(Target::Canvas);
        Self {
            view: MechanismView::new(mechanism),
            window,
            canvas,
            target,
        }
    }

    /// Runner tessellating each frame into a vertex buffer instead. The
    /// canvas is only sized; no context is taken from it.
    #[cfg(feature = "vectors")]
    pub fn with_vectors(mechanism: M, window: Window, canvas: HtmlCanvasElement) -> Self {
        Self {
            view: MechanismView::new(mechanism),
            window,
            canvas,
            target: Some(Target::Vectors(VectorSurface::new())),
        }
    }

    pub fn has_surface(&self) -> bool {
        self.target.is_some()
    }

    /// Last frame's triangles and labels, in vector mode.
    #[cfg(feature = "vectors")]
    pub fn vectors(&self) -> Option<&VectorSurface> {
        match self.target.as_ref() {
            Some(Target::Vectors(surface)) => Some(surface),
            _ => None,
        }
    }

    pub fn view(&self) -> &MechanismView<M> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MechanismView<M> {
        &mut self.view
    }

    /// Element whose size the canvas follows: its parent, or the canvas
    /// itself when detached.
    pub fn container(&self) -> Element {
        self.canvas
            .parent_element()
            .unwrap_or_else(|| self.canvas.clone().unchecked_into())
    }

    /// Re-measure the container and resize the backing store to
    /// `container size × devicePixelRatio`.
    pub fn resize(&mut self) -> BackingSize {
        let rect = self.container().get_bounding_client_rect();
        let dpr = self.window.device_pixel_ratio() as f32;
        let size = self.view.resize(rect.width() as f32, rect.height() as f32, dpr);

        // Assigning width/height resets the context, including its transform.
        if self.canvas.width() != size.width {
            self.canvas.set_width(size.width);
        }
        if self.canvas.height() != size.height {
            self.canvas.set_height(size.height);
        }
        let style = self.canvas.style();
        let css = [
            ("width", self.view.viewport().width()),
            ("height", self.view.viewport().height()),
        ];
        for (property, px) in css {
            if let Err(e) = style.set_property(property, &format!("{}px", px)) {
                log::debug!("canvas: style {} failed: {:?}", property, e);
            }
        }

        if self.target.is_none() {
            self.target = CanvasSurface::from_canvas(&self.canvas).map(Target::Canvas);
        }
        size
    }

    /// Draw one frame. Does nothing until a 2D context is available.
    pub fn tick(&mut self) {
        match self.target.as_mut() {
            Some(Target::Canvas(surface)) => self.view.render_frame(surface),
            #[cfg(feature = "vectors")]
            Some(Target::Vectors(surface)) => {
                surface.clear();
                self.view.render_frame(surface);
            }
            None => {}
        }
    }
}
