//! Surface lifecycle and mapping.

use crate::core::compositor::CompositorEvent;
use crate::core::render::node::NodeAnchor;
use crate::core::state::CompositorState;
use crate::core::surface::{MapState, Surface};
use crate::core::wayland::protocol::wl_surface::WlSurface;
use crate::util::logging;

impl CompositorState {
    /// Create a surface and register its node under the primary
    /// output's container. The node starts hidden and non-reactive
    /// until the surface is mapped.
    pub fn create_surface(&mut self, resource: Option<WlSurface>) -> u32 {
        let id = self.next_surface_id();
        self.insert_surface(id, resource);
        id
    }

    pub(crate) fn insert_surface(&mut self, id: u32, resource: Option<WlSurface>) {
        let node = self.scene.create_surface_node(id);
        if let Some(root) = self.primary_output().map(|o| o.node) {
            self.scene.add_child(root, node);
        }
        crate::mlog!(logging::SURFACE, "surface {} created (node {})", id, node);
        self.surfaces.insert(id, Surface::new(id, node, resource));
    }

    pub fn surface(&self, id: u32) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    /// Attach a buffer: move by (dx, dy), take the buffer's size, and
    /// swap the held buffer reference. The node's texture is rebound
    /// before the swap so the outgoing buffer's texture is never
    /// referenced once its last reference is gone.
    pub fn surface_attach(&mut self, surface_id: u32, buffer_id: u32, dx: i32, dy: i32) {
        let Some(node) = self.surfaces.get(&surface_id).map(|s| s.node) else {
            tracing::warn!("attach on unknown surface {}", surface_id);
            return;
        };
        let Some((texture, width, height)) = self
            .buffers
            .get(&buffer_id)
            .map(|b| (b.texture, b.width, b.height))
        else {
            // Buffer creation failed earlier; the client holds a husk.
            tracing::warn!("attach of unknown buffer {} to surface {}", buffer_id, surface_id);
            return;
        };

        if let Some(n) = self.scene.node_mut(node) {
            let (x, y) = (n.x, n.y);
            n.set_position(x + dx, y + dy);
            n.set_size(width as u32, height as u32);
            n.texture = texture;
        }

        if let Some(buffer) = self.buffers.get(&buffer_id) {
            buffer.attach_hook(surface_id);
        }

        // Acquire the new reference before releasing the old one so a
        // re-attach of the same buffer cannot bottom out its count.
        self.buffer_ref(buffer_id);
        let old = self
            .surfaces
            .get_mut(&surface_id)
            .and_then(|s| s.buffer.replace(buffer_id));
        if let Some(old) = old {
            self.buffer_unref(old);
        }

        self.scene.layout();
        self.push_event(CompositorEvent::RedrawNeeded);
    }

    /// Map as an unconstrained toplevel. Clears any anchoring left from
    /// a previous transient or fullscreen mapping.
    pub fn surface_map_toplevel(&mut self, surface_id: u32) {
        let Some(node) = self.surfaces.get(&surface_id).map(|s| s.node) else {
            return;
        };
        if let Some(n) = self.scene.node_mut(node) {
            n.anchor = None;
            n.visible = true;
            n.reactive = true;
        }
        self.set_map_state(surface_id, MapState::Toplevel);
    }

    /// Map anchored to a parent surface at a fixed offset. A surface
    /// already transient under the same parent is left alone.
    pub fn surface_map_transient(
        &mut self,
        surface_id: u32,
        parent_id: u32,
        dx: i32,
        dy: i32,
        _flags: u32,
    ) {
        if let Some(MapState::Transient { parent, .. }) =
            self.surfaces.get(&surface_id).map(|s| s.map_state)
        {
            if parent == parent_id {
                return;
            }
        }
        let Some(node) = self.surfaces.get(&surface_id).map(|s| s.node) else {
            return;
        };
        let Some(parent_node) = self.surfaces.get(&parent_id).map(|s| s.node) else {
            // No error path in the protocol: log and leave the surface
            // unmapped rather than tearing the client down.
            tracing::warn!(
                "transient map of surface {} to missing parent {}; staying unmapped",
                surface_id, parent_id
            );
            return;
        };

        if let Some(n) = self.scene.node_mut(node) {
            n.anchor = Some(NodeAnchor::Offset { parent: parent_node, dx, dy });
            n.visible = true;
            n.reactive = true;
        }
        self.set_map_state(surface_id, MapState::Transient { parent: parent_id, dx, dy });
        self.scene.layout();
    }

    /// Map anchored to the containing output's geometry. The anchors
    /// track the output, so a later output resize follows through.
    pub fn surface_map_fullscreen(&mut self, surface_id: u32) {
        if let Some(MapState::Fullscreen) = self.surfaces.get(&surface_id).map(|s| s.map_state) {
            return;
        }
        let Some(node) = self.surfaces.get(&surface_id).map(|s| s.node) else {
            return;
        };
        let Some(container) = self.primary_output().map(|o| o.node) else {
            tracing::warn!("fullscreen map of surface {} with no output", surface_id);
            return;
        };

        if let Some(n) = self.scene.node_mut(node) {
            n.anchor = Some(NodeAnchor::Fill { container });
            n.visible = true;
            n.reactive = true;
        }
        self.set_map_state(surface_id, MapState::Fullscreen);
        self.scene.layout();
    }

    /// Forward damage to the attached buffer's hook. Without a buffer
    /// this is a no-op; propagation beyond the hook is an extension
    /// point.
    pub fn surface_damage(&mut self, surface_id: u32, x: i32, y: i32, width: i32, height: i32) {
        let Some(buffer_id) = self.surfaces.get(&surface_id).and_then(|s| s.buffer) else {
            return;
        };
        if let Some(buffer) = self.buffers.get(&buffer_id) {
            buffer.damage_hook(surface_id, x, y, width, height);
        }
        self.push_event(CompositorEvent::RedrawNeeded);
    }

    /// Destroy a surface: notify input devices (focus and grab
    /// bookkeeping, with a timestamp), remove the node from the scene,
    /// release the buffer reference, and drop the surface itself.
    pub fn destroy_surface(&mut self, surface_id: u32, time: u32) {
        let focused: Vec<_> = self
            .devices
            .values()
            .filter(|d| {
                d.pointer_focus == Some(surface_id) || d.keyboard_focus == Some(surface_id)
            })
            .map(|d| d.id)
            .collect();
        for device in focused {
            if self.devices.get(&device).and_then(|d| d.pointer_focus) == Some(surface_id) {
                self.set_pointer_focus(device, None, time, 0, 0, 0, 0);
            }
            if self.devices.get(&device).and_then(|d| d.keyboard_focus) == Some(surface_id) {
                self.set_keyboard_focus(device, None, time);
            }
        }

        if let Some(surface) = self.surfaces.remove(&surface_id) {
            self.scene.remove_node(surface.node);
            if let Some(buffer) = surface.buffer {
                self.buffer_unref(buffer);
            }
        }
        crate::mlog!(logging::SURFACE, "surface {} destroyed", surface_id);
        self.push_event(CompositorEvent::SurfaceDestroyed { surface_id });
    }

    /// Reposition a surface's node directly (interactive move).
    pub fn move_surface(&mut self, surface_id: u32, x: i32, y: i32) {
        let Some(node) = self.surfaces.get(&surface_id).map(|s| s.node) else {
            return;
        };
        if let Some(n) = self.scene.node_mut(node) {
            n.set_position(x, y);
        }
        self.push_event(CompositorEvent::RedrawNeeded);
    }

    /// Scene-global to surface-local coordinates.
    pub fn surface_local(&self, surface_id: u32, x: i32, y: i32) -> (i32, i32) {
        let Some(node) = self
            .surfaces
            .get(&surface_id)
            .and_then(|s| self.scene.node(s.node))
        else {
            return (x, y);
        };
        (x - node.x, y - node.y)
    }

    pub fn surface_position(&self, surface_id: u32) -> Option<(i32, i32)> {
        self.surfaces
            .get(&surface_id)
            .and_then(|s| self.scene.node(s.node))
            .map(|n| (n.x, n.y))
    }

    pub fn surface_size(&self, surface_id: u32) -> Option<(u32, u32)> {
        self.surfaces
            .get(&surface_id)
            .and_then(|s| self.scene.node(s.node))
            .map(|n| (n.width, n.height))
    }

    fn set_map_state(&mut self, surface_id: u32, map_state: MapState) {
        if let Some(surface) = self.surfaces.get_mut(&surface_id) {
            let was_mapped = surface.map_state.is_mapped();
            surface.map_state = map_state;
            tracing::debug!("surface {} mapped as {}", surface_id, map_state.name());
            if !was_mapped {
                self.push_event(CompositorEvent::SurfaceMapped { surface_id });
            }
        }
    }
}
