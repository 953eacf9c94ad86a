//! Shell-initiated interactive move and resize.

use wayland_server::Resource;

use crate::core::input::DeviceId;
use crate::core::shell::{valid_resize_edges, MoveGrab, ResizeGrab};
use crate::core::state::CompositorState;
use crate::util::logging;

impl CompositorState {
    /// Start an interactive move by upgrading the implicit grab held by
    /// the pressing device. Silently ignored when the request does not
    /// match the press that justified it.
    pub fn shell_move(&mut self, surface_id: u32, device: DeviceId, time: u32) {
        if !self.grab_matches(surface_id, device, time) {
            return;
        }
        let Some((sx, sy)) = self.surface_position(surface_id) else {
            return;
        };
        let Some((grab_x, grab_y)) = self.devices.get(&device).map(|d| (d.grab_x, d.grab_y))
        else {
            return;
        };
        let grab = MoveGrab { dx: sx - grab_x, dy: sy - grab_y };
        if self.update_grab(device, Box::new(grab)).is_ok() {
            crate::mlog!(logging::SHELL, "move grab on surface {}", surface_id);
        }
    }

    /// Start an interactive resize. Invalid edge masks are rejected
    /// before any grab state is touched.
    pub fn shell_resize(&mut self, surface_id: u32, device: DeviceId, time: u32, edges: u32) {
        if !valid_resize_edges(edges) {
            tracing::warn!("resize with invalid edge mask {:#x}", edges);
            return;
        }
        if !self.grab_matches(surface_id, device, time) {
            return;
        }
        let Some((width, height)) = self.surface_size(surface_id) else {
            return;
        };
        let grab = ResizeGrab {
            edges,
            start_width: width as i32,
            start_height: height as i32,
        };
        if self.update_grab(device, Box::new(grab)).is_ok() {
            crate::mlog!(
                logging::SHELL,
                "resize grab on surface {} edges {:#x}",
                surface_id,
                edges
            );
        }
    }

    /// A shell grab is only honored when the named device still holds
    /// the implicit grab from the press the client is reacting to, and
    /// that press landed on the named surface.
    fn grab_matches(&self, surface_id: u32, device: DeviceId, time: u32) -> bool {
        let Some(d) = self.devices.get(&device) else {
            return false;
        };
        let Some(grab) = d.grab.as_ref() else {
            return false;
        };
        grab.time == time && d.pointer_focus == Some(surface_id)
    }

    /// Post a configure event to the shell handle owned by the surface's
    /// client.
    pub fn send_shell_configure(
        &self,
        surface_id: u32,
        time: u32,
        edges: u32,
        width: i32,
        height: i32,
    ) {
        let Some(surface_res) = self.surfaces.get(&surface_id).and_then(|s| s.resource.clone())
        else {
            return;
        };
        let client = surface_res.client();
        for shell in &self.shell_resources {
            if shell.client() == client {
                shell.configure(time, edges, &surface_res, width, height);
            }
        }
    }
}
