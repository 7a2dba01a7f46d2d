use std::cell::Cell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, ResizeObserver};

/// A `ResizeObserver` watching one element.
///
/// Disconnects on [`disconnect`](Self::disconnect) or drop, whichever
/// comes first.
pub struct ResizeBinding {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut()>,
    connected: Cell<bool>,
}

impl ResizeBinding {
    pub fn observe(target: &Element, on_resize: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(on_resize) as Box<dyn FnMut()>);
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(target);
        Ok(Self {
            observer,
            _callback: callback,
            connected: Cell::new(true),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    pub fn disconnect(&self) {
        if self.connected.replace(false) {
            self.observer.disconnect();
        }
    }
}

impl Drop for ResizeBinding {
    fn drop(&mut self) {
        self.disconnect();
    }
}
