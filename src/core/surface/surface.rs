use crate::core::wayland::protocol::wl_surface::WlSurface;

/// How a surface is currently mapped.
///
/// Mapped states transition to one another directly; destruction is
/// terminal and removes the surface from the compositor's tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    Unmapped,
    Toplevel,
    Transient { parent: u32, dx: i32, dy: i32 },
    Fullscreen,
}

impl MapState {
    pub fn is_mapped(&self) -> bool {
        !matches!(self, MapState::Unmapped)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MapState::Unmapped => "unmapped",
            MapState::Toplevel => "toplevel",
            MapState::Transient { .. } => "transient",
            MapState::Fullscreen => "fullscreen",
        }
    }
}

/// A client-owned rendering target.
///
/// The surface holds at most one buffer reference and one scene node;
/// cross-object operations (attach, mapping, destruction) live on
/// `CompositorState` because they touch the scene and the buffer table.
pub struct Surface {
    pub id: u32,
    /// The scene node backing this surface's renderable.
    pub node: u32,
    /// Currently attached buffer, counted in that buffer's refs.
    pub buffer: Option<u32>,
    pub map_state: MapState,
    /// The Wayland resource handle, None for surfaces created outside a
    /// client connection (tests, cursors).
    pub resource: Option<WlSurface>,
}

impl Surface {
    pub fn new(id: u32, node: u32, resource: Option<WlSurface>) -> Self {
        Self {
            id,
            node,
            buffer: None,
            map_state: MapState::Unmapped,
            resource,
        }
    }
}
