use crate::api::config::ViewConfig;
use crate::api::painter::Painter;
use crate::core::math::Orientation;

/// The contract every mechanism diagram fulfills.
///
/// A mechanism is a fixed sequence of steps. Each frame the view asks for
/// the sites of the current step under the live orientation, then hands
/// them back to [`draw`](Mechanism::draw) together with a [`Painter`].
pub trait Mechanism {
    /// Placed sites for one step.
    ///
    /// Hand-authored mechanisms use an enum with one variant per step so
    /// each step's required sites are named fields. Data-driven ones use
    /// [`StepSites`](super::sites::StepSites).
    type Sites;

    /// View configuration. Called once when the view is created.
    fn config(&self) -> ViewConfig {
        ViewConfig::default()
    }

    /// Number of steps. Must be at least one.
    fn step_count(&self) -> usize;

    /// Heading for a step, shown by the host UI.
    fn step_title(&self, step: usize) -> &str;

    /// Compute the step's sites for this frame. `step` is always in range.
    fn sites(&self, step: usize, orientation: Orientation) -> Self::Sites;

    /// Draw a step: bonds, then atoms, then annotations.
    fn draw(&self, sites: &Self::Sites, painter: &mut Painter);
}
