pub mod config;
pub mod mechanism;
pub mod painter;
pub mod sites;
pub mod view;
