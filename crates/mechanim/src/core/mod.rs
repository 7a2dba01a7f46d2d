pub mod color;
pub mod driver;
pub mod math;
pub mod viewport;
