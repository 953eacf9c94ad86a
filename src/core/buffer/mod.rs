pub mod buffer;
pub mod format;

pub use buffer::{Buffer, BufferBacking};
pub use format::{PixelFormat, Visual};

#[cfg(test)]
pub mod tests;
