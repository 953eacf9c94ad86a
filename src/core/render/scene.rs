use std::collections::HashMap;

use crate::core::render::node::{NodeAnchor, SceneNode};

/// The scene graph: flat node storage plus parent/child z-ordering.
///
/// This is the in-crate stand-in for the rendering toolkit's containers.
/// The compositor mutates it synchronously from dispatch callbacks; the
/// host flattens it when drawing a frame.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: HashMap<u32, SceneNode>,
    next_id: u32,
}

/// A visible, textured node ready for drawing, in paint order.
#[derive(Debug, Clone)]
pub struct PaintEntry {
    pub surface_id: u32,
    pub texture: crate::core::render::host::TextureId,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_node(&mut self) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        self.nodes.insert(id, SceneNode::new(id));
        id
    }

    pub fn create_surface_node(&mut self, surface_id: u32) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        self.nodes.insert(id, SceneNode::new(id).with_surface(surface_id));
        id
    }

    pub fn node(&self, id: u32) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: u32) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn add_child(&mut self, parent_id: u32, child_id: u32) {
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            if !parent.children.contains(&child_id) {
                parent.children.push(child_id);
            }
        }
    }

    /// Detach a node from any parent and drop it.
    pub fn remove_node(&mut self, node_id: u32) {
        for node in self.nodes.values_mut() {
            node.children.retain(|&id| id != node_id);
        }
        self.nodes.remove(&node_id);
    }

    /// Move a node to the end of its parent's paint order.
    pub fn raise_to_top(&mut self, node_id: u32) {
        for node in self.nodes.values_mut() {
            if let Some(pos) = node.children.iter().position(|&id| id == node_id) {
                node.children.remove(pos);
                node.children.push(node_id);
                return;
            }
        }
    }

    /// Resolve anchors against their current targets.
    ///
    /// Offset anchors follow the parent's position; fill anchors copy the
    /// container's geometry, so an output resize propagates to fullscreen
    /// surfaces here.
    pub fn layout(&mut self) {
        let anchored: Vec<(u32, NodeAnchor)> = self
            .nodes
            .iter()
            .filter_map(|(&id, node)| node.anchor.map(|a| (id, a)))
            .collect();

        for (id, anchor) in anchored {
            match anchor {
                NodeAnchor::Offset { parent, dx, dy } => {
                    let Some(p) = self.nodes.get(&parent).map(|n| (n.x, n.y)) else {
                        continue;
                    };
                    if let Some(node) = self.nodes.get_mut(&id) {
                        node.set_position(p.0 + dx, p.1 + dy);
                    }
                }
                NodeAnchor::Fill { container } => {
                    let Some(rect) = self.nodes.get(&container).map(|n| n.rect()) else {
                        continue;
                    };
                    if let Some(node) = self.nodes.get_mut(&id) {
                        node.set_position(rect.x, rect.y);
                        node.set_size(rect.width, rect.height);
                    }
                }
            }
        }
    }

    /// Topmost reactive surface under a scene-global point, if any.
    pub fn pick(&self, root: u32, x: i32, y: i32) -> Option<u32> {
        let node = self.nodes.get(&root)?;
        // Later children paint on top, so walk them back to front.
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.pick(child, x, y) {
                return Some(hit);
            }
        }
        if node.visible && node.reactive && node.surface_id.is_some() && node.rect().contains(x, y)
        {
            return node.surface_id;
        }
        None
    }

    /// Flatten a container's subtree into paint order.
    pub fn paint_list(&self, root: u32) -> Vec<PaintEntry> {
        let mut out = Vec::new();
        self.collect_paint(root, &mut out);
        out
    }

    fn collect_paint(&self, node_id: u32, out: &mut Vec<PaintEntry>) {
        let Some(node) = self.nodes.get(&node_id) else {
            return;
        };
        if let (true, Some(surface_id), Some(texture)) =
            (node.visible, node.surface_id, node.texture)
        {
            out.push(PaintEntry {
                surface_id,
                texture,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
            });
        }
        for &child in &node.children {
            self.collect_paint(child, out);
        }
    }
}
