pub mod errors;
pub mod time;
pub mod state;
pub mod compositor;
pub mod output;
pub mod wayland;
pub mod surface;
pub mod buffer;
pub mod input;
pub mod shell;
pub mod render;

// Re-export key types
pub use compositor::{Compositor, CompositorConfig, CompositorEvent};
pub use state::CompositorState;
