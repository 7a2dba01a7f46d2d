use mechanim::{FrameCallback, FrameHandle, FrameScheduler};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// [`FrameScheduler`] backed by `requestAnimationFrame`.
///
/// Each request wraps its callback in a one-shot JS closure that frees
/// itself when it runs. A cancelled request never runs, so its closure
/// stays allocated; one per teardown.
pub struct RafScheduler {
    window: Window,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for RafScheduler {
    fn request(&self, callback: FrameCallback) -> Option<FrameHandle> {
        let js = Closure::once_into_js(move || callback());
        match self.window.request_animation_frame(js.unchecked_ref()) {
            Ok(id) => Some(FrameHandle(id as u32)),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel(&self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0 as i32) {
            log::debug!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}
