//! Outputs: rendering destinations with geometry.

use crate::core::wayland::protocol::wl_output::WlOutput;
use crate::util::geometry::Rect;

/// One rendering destination. Its scene container node is the parent of
/// every surface node composited onto it; fullscreen surfaces anchor to
/// the container, so `set_geometry` propagates on the next layout pass.
pub struct Output {
    pub id: u32,
    /// Root container node in the scene graph.
    pub node: u32,
    pub rect: Rect,
    /// Set when the host window's close button was pressed.
    pub close_requested: bool,
    pub resources: Vec<WlOutput>,
}

impl Output {
    pub fn new(id: u32, node: u32, rect: Rect) -> Self {
        Self {
            id,
            node,
            rect,
            close_requested: false,
            resources: Vec::new(),
        }
    }

    pub fn add_resource(&mut self, resource: WlOutput) {
        resource.geometry(self.rect.x, self.rect.y, self.rect.width as i32, self.rect.height as i32);
        self.resources.push(resource);
    }
}
