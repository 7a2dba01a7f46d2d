pub mod primitives;
pub mod recorder;
pub mod style;
pub mod surface;
#[cfg(feature = "vectors")]
pub mod vector_surface;

pub use primitives::{bond_offset, draw_arrow, draw_atom, draw_bond, draw_curved_arrow, BondKind};
pub use recorder::{CommandRecorder, DrawCommand};
pub use style::{RenderStyle, ShadowStyle};
pub use surface::{RadialGradient, Shadow, Stroke, Surface, TextAlign, TextStyle};
#[cfg(feature = "vectors")]
pub use vector_surface::{TextLabel, VectorSurface, VectorVertex};
