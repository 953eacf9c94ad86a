use crate::core::render::host::TextureId;
use crate::util::geometry::Rect;

/// Positional constraint resolved on every [`Scene::layout`] pass.
///
/// Anchors track their target dynamically: moving the parent or resizing
/// the output container moves the anchored node on the next layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAnchor {
    /// Pin to a parent node's position plus a fixed offset.
    Offset { parent: u32, dx: i32, dy: i32 },
    /// Pin position and size to a container node's geometry.
    Fill { container: u32 },
}

/// One node in the scene graph: a surface's renderable, or a container.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: u32,
    pub surface_id: Option<u32>,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    /// Whether this node receives input events.
    pub reactive: bool,
    pub texture: Option<TextureId>,
    pub anchor: Option<NodeAnchor>,
    /// Child z-order: later entries paint on top.
    pub children: Vec<u32>,
}

impl SceneNode {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            surface_id: None,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            visible: false,
            reactive: false,
            texture: None,
            anchor: None,
            children: Vec::new(),
        }
    }

    pub fn with_surface(mut self, surface_id: u32) -> Self {
        self.surface_id = Some(surface_id);
        self
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
