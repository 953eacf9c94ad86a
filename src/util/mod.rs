pub mod geometry;
pub mod logging;
