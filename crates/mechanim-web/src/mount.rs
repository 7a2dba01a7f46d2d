use std::cell::RefCell;
use std::rc::Rc;

use mechanim::{start_animation, CancelToken, Mechanism, MechanismView};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, Window};

use crate::frame::RafScheduler;
use crate::resize::ResizeBinding;
use crate::runner::ViewRunner;

/// A mechanism view attached to a canvas: the runner, its animation loop
/// and the resize observer on the canvas container.
///
/// [`detach`](Self::detach) stops both and is safe to call more than once.
/// Dropping a mount detaches it.
pub struct Mount<M: Mechanism + 'static> {
    runner: Rc<RefCell<ViewRunner<M>>>,
    animation: CancelToken,
    resize: ResizeBinding,
}

impl<M: Mechanism + 'static> Mount<M> {
    /// Attach `mechanism` to the canvas with id `canvas_id`.
    ///
    /// Returns `Ok(None)` without starting anything when the canvas has no
    /// 2D context.
    pub fn attach(mechanism: M, canvas_id: &str) -> Result<Option<Self>, JsValue> {
        let (window, canvas) = find_canvas(canvas_id)?;
        let runner = ViewRunner::new(mechanism, window.clone(), canvas);
        if !runner.has_surface() {
            log::warn!("#{}: 2d context unavailable, not starting", canvas_id);
            return Ok(None);
        }
        Self::start(runner, window, canvas_id).map(Some)
    }

    /// Attach in vector mode: frames are tessellated for a GPU host that
    /// reads [`ViewRunner::vectors`] after each tick.
    #[cfg(feature = "vectors")]
    pub fn attach_vectors(mechanism: M, canvas_id: &str) -> Result<Self, JsValue> {
        let (window, canvas) = find_canvas(canvas_id)?;
        let runner = ViewRunner::with_vectors(mechanism, window.clone(), canvas);
        Self::start(runner, window, canvas_id)
    }

    fn start(runner: ViewRunner<M>, window: Window, canvas_id: &str) -> Result<Self, JsValue> {
        let runner = Rc::new(RefCell::new(runner));
        runner.borrow_mut().resize();

        let container = runner.borrow().container();
        let on_resize = {
            let runner = Rc::clone(&runner);
            move || {
                if let Ok(mut r) = runner.try_borrow_mut() {
                    r.resize();
                }
            }
        };
        let resize = ResizeBinding::observe(&container, on_resize)?;

        let on_frame = {
            let runner = Rc::clone(&runner);
            move || {
                if let Ok(mut r) = runner.try_borrow_mut() {
                    r.tick();
                }
            }
        };
        let animation = start_animation(Rc::new(RafScheduler::new(window)), on_frame);

        log::info!("#{}: mounted", canvas_id);
        Ok(Self { runner, animation, resize })
    }

    /// Stop the animation and the resize observer.
    pub fn detach(&self) {
        self.animation.cancel();
        self.resize.disconnect();
    }

    pub fn is_attached(&self) -> bool {
        !self.animation.is_cancelled()
    }

    pub fn with_view<R>(&self, f: impl FnOnce(&mut MechanismView<M>) -> R) -> R {
        f(self.runner.borrow_mut().view_mut())
    }
    pub fn with_runner<R>(&self, f: impl FnOnce(&ViewRunner<M>) -> R) -> R {
        f(&self.runner.borrow())
    }
}

fn find_canvas(canvas_id: &str) -> Result<(Window, HtmlCanvasElement), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing canvas #{}", canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()?;
    Ok((window, canvas))
}

impl<M: Mechanism + 'static> Drop for Mount<M> {
    fn drop(&mut self) {
        self.detach();
    }
}
