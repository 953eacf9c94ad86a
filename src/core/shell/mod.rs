pub mod grabs;

pub use grabs::{resize_dimensions, valid_resize_edges, MoveGrab, ResizeGrab};
pub use grabs::{EDGE_BOTTOM, EDGE_LEFT, EDGE_RIGHT, EDGE_TOP};

#[cfg(test)]
pub mod tests;
