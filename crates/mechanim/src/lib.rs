pub mod api;
pub mod assets;
pub mod core;
pub mod input;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, ViewConfig};
pub use api::mechanism::Mechanism;
pub use api::painter::{Atom, Bond, Molecule, Painter};
pub use api::sites::{SiteLayout, SiteMap, StepSites};
pub use api::view::MechanismView;
pub use assets::manifest::{ManifestError, ManifestMechanism, ManifestSites, MechanismManifest};
pub use core::color::{shade_color, ColorError, Rgb, Rgba};
pub use core::driver::{
    start_animation, CancelToken, DriverState, FrameCallback, FrameHandle, FrameScheduler,
    ManualScheduler,
};
pub use core::math::{depth_scale, rotate3d, Orientation, Point3D, Projection, Projector};
pub use core::viewport::{BackingSize, Viewport};
pub use input::queue::{InputQueue, ViewEvent};
pub use renderer::primitives::{draw_arrow, draw_atom, draw_bond, draw_curved_arrow, BondKind};
pub use renderer::recorder::{CommandRecorder, DrawCommand};
pub use renderer::style::RenderStyle;
pub use renderer::surface::{RadialGradient, Shadow, Stroke, Surface, TextAlign, TextStyle};

#[cfg(feature = "vectors")]
pub use renderer::vector_surface::{TextLabel, VectorSurface, VectorVertex};
