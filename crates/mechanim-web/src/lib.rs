pub mod canvas;
pub mod frame;
pub mod mount;
pub mod resize;
pub mod runner;

pub use mechanim;

pub use canvas::CanvasSurface;
pub use frame::RafScheduler;
pub use mount::Mount;
pub use resize::ResizeBinding;
pub use runner::ViewRunner;

/// Generate all `#[wasm_bindgen]` exports for a mechanism.
///
/// Generates:
/// - `thread_local!` storage for the current [`Mount`]
/// - `with_view()` helper function
/// - the `view_*` exports (mount/unmount, step navigation, rotation control)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod mechanism;
/// use mechanism::CarbonylReduction;
///
/// mechanim_web::export_mechanism!(CarbonylReduction, "carbonyl-reduction");
/// ```
///
/// A third argument replaces `<$ty>::new()` with any expression returning
/// `Result<$ty, E>` where `E: Display`, for mechanisms whose construction
/// can fail (e.g. loading a manifest).
///
/// A trailing `vectors` also exports `view_mount_vectors` and the
/// `view_vector_*` accessors for GPU hosts (needs the `vectors` feature).
///
/// The calling crate must depend on `wasm-bindgen`, `log`, `console_log`
/// and `console_error_panic_hook`.
#[macro_export]
macro_rules! export_mechanism {
    // Vector accessors, shared by both `vectors` forms
    (@vectors $ty:ty) => {
        fn with_runner<R>(f: impl FnOnce(&$crate::ViewRunner<$ty>) -> R) -> Option<R> {
            MOUNT.with(|cell| cell.borrow().as_ref().map(|mount| mount.with_runner(f)))
        }

        fn with_label<R>(index: usize, f: impl FnOnce(&$crate::mechanim::TextLabel) -> R) -> Option<R> {
            with_runner(|r| r.vectors().and_then(|v| v.labels().get(index)).map(f)).flatten()
        }

        /// Mount for a GPU host: no 2D context is taken; each frame's
        /// triangles and labels are read through `view_vector_*`.
        #[wasm_bindgen]
        pub fn view_mount_vectors(canvas_id: &str) -> Result<(), JsValue> {
            mount_with(|m| $crate::Mount::attach_vectors(m, canvas_id).map(Some))
        }

        #[wasm_bindgen]
        pub fn view_vector_vertices_ptr() -> *const f32 {
            with_runner(|r| r.vectors().map(|v| v.buffer_ptr()))
                .flatten()
                .unwrap_or(::std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn view_vector_vertex_count() -> u32 {
            with_runner(|r| r.vectors().map_or(0, |v| v.vertex_count() as u32)).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn view_vector_label_count() -> u32 {
            with_runner(|r| r.vectors().map_or(0, |v| v.labels().len() as u32)).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn view_vector_label_text(index: usize) -> String {
            with_label(index, |l| l.text.clone()).unwrap_or_default()
        }

        /// `[x, y, size_px, r, g, b, bold, centered]`, empty when out of range.
        #[wasm_bindgen]
        pub fn view_vector_label_layout(index: usize) -> Vec<f32> {
            with_label(index, |l| l.layout().to_vec()).unwrap_or_default()
        }
    };

    ($ty:ty, $name:literal, vectors) => {
        $crate::export_mechanism!($ty, $name);
        $crate::export_mechanism!(@vectors $ty);
    };

    ($ty:ty, $name:literal, $ctor:expr, vectors) => {
        $crate::export_mechanism!($ty, $name, $ctor);
        $crate::export_mechanism!(@vectors $ty);
    };

    ($ty:ty, $name:literal) => {
        $crate::export_mechanism!(
            $ty,
            $name,
            ::std::result::Result::<$ty, ::std::convert::Infallible>::Ok(<$ty>::new())
        );
    };

    ($ty:ty, $name:literal, $ctor:expr) => {
        use std::cell::RefCell;

        thread_local! {
            static MOUNT: RefCell<Option<$crate::Mount<$ty>>> = RefCell::new(None);
        }

        /// Run `f` on the mounted view. `None` when nothing is mounted.
        fn with_view<R>(f: impl FnOnce(&mut $crate::mechanim::MechanismView<$ty>) -> R) -> Option<R> {
            MOUNT.with(|cell| cell.borrow().as_ref().map(|mount| mount.with_view(f)))
        }

        /// Replace any current mount with a fresh mechanism attached by
        /// `attach`.
        fn mount_with(
            attach: impl FnOnce($ty) -> Result<Option<$crate::Mount<$ty>>, JsValue>,
        ) -> Result<(), JsValue> {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            view_unmount();
            let mechanism = ($ctor).map_err(|e| JsValue::from_str(&e.to_string()))?;
            match attach(mechanism)? {
                Some(mount) => {
                    MOUNT.with(|cell| *cell.borrow_mut() = Some(mount));
                    log::info!("{}: initialized", $name);
                }
                None => log::warn!("{}: nothing to draw on", $name),
            }
            Ok(())
        }

        #[wasm_bindgen]
        pub fn view_mount(canvas_id: &str) -> Result<(), JsValue> {
            mount_with(|m| $crate::Mount::attach(m, canvas_id))
        }

        #[wasm_bindgen]
        pub fn view_unmount() {
            let mount = MOUNT.with(|cell| cell.borrow_mut().take());
            if let Some(mount) = mount {
                mount.detach();
                log::info!("{}: unmounted", $name);
            }
        }

        #[wasm_bindgen]
        pub fn view_set_step(step: usize) {
            with_view(|v| v.apply($crate::mechanim::ViewEvent::SetStep(step)));
        }

        #[wasm_bindgen]
        pub fn view_next_step() {
            with_view(|v| v.apply($crate::mechanim::ViewEvent::NextStep));
        }

        #[wasm_bindgen]
        pub fn view_prev_step() {
            with_view(|v| v.apply($crate::mechanim::ViewEvent::PrevStep));
        }

        #[wasm_bindgen]
        pub fn view_step() -> usize {
            with_view(|v| v.step()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn view_step_count() -> usize {
            with_view(|v| v.step_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn view_step_title() -> String {
            with_view(|v| v.step_title().to_string()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn view_set_auto_rotate(on: bool) {
            with_view(|v| v.push_input($crate::mechanim::ViewEvent::SetAutoRotate(on)));
        }

        #[wasm_bindgen]
        pub fn view_toggle_auto_rotate() {
            with_view(|v| v.push_input($crate::mechanim::ViewEvent::ToggleAutoRotate));
        }

        #[wasm_bindgen]
        pub fn view_rotate(delta: f32) {
            with_view(|v| v.push_input($crate::mechanim::ViewEvent::Rotate(delta)));
        }

        #[wasm_bindgen]
        pub fn view_reset_rotation() {
            with_view(|v| v.push_input($crate::mechanim::ViewEvent::ResetRotation));
        }

        #[wasm_bindgen]
        pub fn view_rotation() -> f32 {
            with_view(|v| v.viewport().rotation()).unwrap_or(0.0)
        }
    };
}
