// Madrona Compositor
//
// Minimal Wayland compositor core: protocol dispatch, the
// surface/buffer object graph, and input routing. Rendering and
// buffer import are delegated to a pluggable graphics host.

pub mod core;
pub mod util;
pub mod prelude;

pub use crate::core::compositor::{Compositor, CompositorConfig, CompositorEvent};
pub use crate::core::state::CompositorState;
