//! [`Surface`] over a browser `CanvasRenderingContext2d`.

use glam::Vec2;
use mechanim::renderer::surface::{RadialGradient, Shadow, Stroke, Surface, TextAlign, TextStyle};
use mechanim::Rgb;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the canvas's 2D context. `None` when the browser refuses one.
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    // fillStyle/strokeStyle are set by reflection so one path covers both
    // plain colors and gradients.
    fn set_style(&self, property: &str, value: &JsValue) {
        if let Err(e) = js_sys::Reflect::set(self.ctx.as_ref(), &JsValue::from_str(property), value) {
            log::debug!("canvas: setting {} failed: {:?}", property, e);
        }
    }

    fn set_fill(&self, value: &JsValue) {
        self.set_style("fillStyle", value);
    }

    fn set_stroke(&self, value: &JsValue) {
        self.set_style("strokeStyle", value);
    }

    fn trace_polygon(&self, points: &[Vec2]) {
        self.ctx.begin_path();
        self.ctx.move_to(points[0].x as f64, points[0].y as f64);
        for p in &points[1..] {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
    }
}

impl Surface for CanvasSurface {
    fn backend(&self) -> &'static str {
        "canvas2d"
    }

    fn set_transform_scale(&mut self, scale: f32) {
        let s = scale as f64;
        if let Err(e) = self.ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0) {
            log::debug!("canvas: setTransform failed: {:?}", e);
        }
    }

    fn fill_rect(&mut self, origin: Vec2, width: f32, height: f32, color: Rgb) {
        self.set_fill(&JsValue::from_str(&color.to_hex()));
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, width as f64, height as f64);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.set_stroke(&JsValue::from_str(&stroke.color.to_hex()));
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn set_line_dash(&mut self, pattern: &[f32]) {
        let segments: js_sys::Array = pattern.iter().map(|d| JsValue::from_f64(*d as f64)).collect();
        if let Err(e) = self.ctx.set_line_dash(&segments) {
            log::debug!("canvas: setLineDash failed: {:?}", e);
        }
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.ctx.set_shadow_color(&shadow.color.to_css());
        self.ctx.set_shadow_blur(shadow.blur as f64);
        self.ctx.set_shadow_offset_x(shadow.offset.x as f64);
        self.ctx.set_shadow_offset_y(shadow.offset.y as f64);
    }

    fn clear_shadow(&mut self) {
        self.ctx.set_shadow_color("transparent");
        self.ctx.set_shadow_blur(0.0);
        self.ctx.set_shadow_offset_x(0.0);
        self.ctx.set_shadow_offset_y(0.0);
    }

    fn fill_radial_circle(&mut self, center: Vec2, radius: f32, gradient: &RadialGradient) {
        let (cx, cy, r) = (center.x as f64, center.y as f64, radius as f64);
        let focus = center + gradient.focus;
        let fill = match self
            .ctx
            .create_radial_gradient(focus.x as f64, focus.y as f64, 0.0, cx, cy, r)
        {
            Ok(g) => {
                let stops = g
                    .add_color_stop(0.0, &gradient.inner.to_hex())
                    .and_then(|()| g.add_color_stop(1.0, &gradient.outer.to_hex()));
                if let Err(e) = stops {
                    log::debug!("canvas: addColorStop failed: {:?}", e);
                }
                JsValue::from(g)
            }
            Err(e) => {
                log::debug!("canvas: createRadialGradient failed, flat fill: {:?}", e);
                JsValue::from_str(&gradient.inner.to_hex())
            }
        };
        self.set_fill(&fill);
        self.ctx.begin_path();
        if let Err(e) = self.ctx.arc(cx, cy, r, 0.0, std::f64::consts::TAU) {
            log::debug!("canvas: arc failed: {:?}", e);
            return;
        }
        self.ctx.fill();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        self.set_fill(&JsValue::from_str(&color.to_hex()));
        self.trace_polygon(points);
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle) {
        self.set_fill(&JsValue::from_str(&style.color.to_hex()));
        self.ctx.set_font(&style.css_font());
        match style.align {
            TextAlign::Center => {
                self.ctx.set_text_align("center");
                self.ctx.set_text_baseline("middle");
            }
            TextAlign::Left => {
                self.ctx.set_text_align("left");
                self.ctx.set_text_baseline("top");
            }
        }
        if let Err(e) = self.ctx.fill_text(text, at.x as f64, at.y as f64) {
            log::debug!("canvas: fillText failed: {:?}", e);
        }
    }
}
