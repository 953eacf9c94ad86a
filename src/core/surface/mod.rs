pub mod surface;

pub use surface::{MapState, Surface};

#[cfg(test)]
pub mod tests;
