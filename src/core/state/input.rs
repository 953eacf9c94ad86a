//! Input routing, focus, and grab management.

use wayland_server::Resource;

use crate::core::errors::{CoreError, Result};
use crate::core::input::event::{translate_button, translate_keycode, HostEvent};
use crate::core::input::grab::{ActiveGrab, PassiveGrab, PointerGrab};
use crate::core::input::DeviceId;
use crate::core::state::CompositorState;

impl CompositorState {
    /// Route one host event through grab or focus-based delivery.
    /// Returns whether the event was consumed; unhandled events fall
    /// back to the host toolkit's default processing.
    pub fn route_event(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::Motion { device, time, x, y, source } => {
                self.handle_motion(device, time, x, y, source)
            }
            HostEvent::ButtonPress { device, time, button, source } => {
                self.handle_button(device, time, translate_button(button), true, source)
            }
            HostEvent::ButtonRelease { device, time, button, source } => {
                self.handle_button(device, time, translate_button(button), false, source)
            }
            HostEvent::KeyPress { device, time, keycode } => {
                self.handle_key(device, time, translate_keycode(keycode), true)
            }
            HostEvent::KeyRelease { device, time, keycode } => {
                self.handle_key(device, time, translate_keycode(keycode), false)
            }
            HostEvent::Enter { .. } | HostEvent::Leave { .. } | HostEvent::Scroll { .. } => {
                tracing::trace!("unrouted host event {:?}", event);
                false
            }
        }
    }

    fn handle_motion(
        &mut self,
        device: DeviceId,
        time: u32,
        x: i32,
        y: i32,
        source: Option<u32>,
    ) -> bool {
        if let Some(d) = self.devices.get_mut(&device) {
            d.x = x;
            d.y = y;
        } else {
            return false;
        }

        if self.devices.get(&device).is_some_and(|d| d.has_grab()) {
            self.with_grab(device, |grab, state| {
                grab.handler.motion(state, device, time, x, y);
            });
            return true;
        }

        // Fall back to a scene pick when the host did not resolve the
        // surface under the pointer itself.
        let Some(target) = source.or_else(|| self.pick_surface(x, y)) else {
            return false;
        };
        let (sx, sy) = self.surface_local(target, x, y);
        self.set_pointer_focus(device, Some(target), time, x, y, sx, sy);
        self.send_motion(device, target, time, x, y, sx, sy);
        true
    }

    fn handle_button(
        &mut self,
        device: DeviceId,
        time: u32,
        button: u32,
        pressed: bool,
        source: Option<u32>,
    ) -> bool {
        let has_grab = self.devices.get(&device).is_some_and(|d| d.has_grab());
        if !has_grab {
            let target =
                source.or_else(|| self.devices.get(&device).and_then(|d| d.pointer_focus));
            let Some(surface_id) = target else {
                return false;
            };
            if !pressed {
                return false;
            }
            // First press: raise the target, install the implicit grab
            // for the press-release pair, move keyboard focus.
            if let Some(node) = self.surfaces.get(&surface_id).map(|s| s.node) {
                self.scene.raise_to_top(node);
                self.push_event(crate::core::compositor::CompositorEvent::RedrawNeeded);
            }
            if let Err(err) = self.start_grab(device, Box::new(PassiveGrab), button, time, true) {
                tracing::warn!("implicit grab failed: {}", err);
            }
            self.set_keyboard_focus(device, Some(surface_id), time);
        }

        let grab_button = self.devices.get(&device).and_then(|d| d.grab.as_ref().map(|g| g.button));
        self.with_grab(device, |grab, state| {
            grab.handler.button(state, device, time, button, pressed);
        });

        if !pressed && grab_button == Some(button) {
            self.end_grab(device, time);
        }
        true
    }

    fn handle_key(&mut self, device: DeviceId, time: u32, key: u32, pressed: bool) -> bool {
        let Some(surface_id) = self.devices.get(&device).and_then(|d| d.keyboard_focus) else {
            return false;
        };
        self.send_key(device, surface_id, time, key, pressed);
        true
    }

    /// Topmost reactive surface under the point, searching every output.
    pub fn pick_surface(&self, x: i32, y: i32) -> Option<u32> {
        self.outputs
            .iter()
            .rev()
            .find_map(|o| self.scene.pick(o.node, x, y))
    }

    /// Move pointer focus, emitting the leave/enter pair. The old focus
    /// holder sees a nil surface, the new one the surface with both
    /// coordinate spaces.
    pub fn set_pointer_focus(
        &mut self,
        device: DeviceId,
        surface: Option<u32>,
        time: u32,
        x: i32,
        y: i32,
        sx: i32,
        sy: i32,
    ) {
        let old = self.devices.get(&device).and_then(|d| d.pointer_focus);
        if old == surface {
            return;
        }
        if let Some(old_id) = old {
            self.send_pointer_focus(device, old_id, time, None, 0, 0, 0, 0);
        }
        if let Some(new_id) = surface {
            self.send_pointer_focus(device, new_id, time, Some(new_id), x, y, sx, sy);
        }
        if let Some(d) = self.devices.get_mut(&device) {
            d.pointer_focus = surface;
            d.pointer_focus_time = time;
        }
    }

    /// Move keyboard focus, emitting the leave/enter pair. The pressed-key
    /// array is always empty here; key state lives in the host toolkit.
    pub fn set_keyboard_focus(&mut self, device: DeviceId, surface: Option<u32>, time: u32) {
        let old = self.devices.get(&device).and_then(|d| d.keyboard_focus);
        if old == surface {
            return;
        }
        if let Some(old_id) = old {
            self.send_keyboard_focus(device, old_id, time, None);
        }
        if let Some(new_id) = surface {
            self.send_keyboard_focus(device, new_id, time, Some(new_id));
        }
        if let Some(d) = self.devices.get_mut(&device) {
            d.keyboard_focus = surface;
        }
    }

    /// Install a grab on a device. Only one grab may be active at a time;
    /// upgrading an implicit grab goes through [`Self::update_grab`].
    pub fn start_grab(
        &mut self,
        device: DeviceId,
        handler: Box<dyn PointerGrab>,
        button: u32,
        time: u32,
        passive: bool,
    ) -> Result<()> {
        let Some(d) = self.devices.get_mut(&device) else {
            return Err(CoreError::state_error(format!("no such device {}", device)));
        };
        if d.grab.is_some() {
            return Err(CoreError::state_error("grab already active"));
        }
        d.grab_x = d.x;
        d.grab_y = d.y;
        d.grab = Some(ActiveGrab { handler, button, time, passive });
        Ok(())
    }

    /// Replace the handler of the implicit grab in place, keeping the
    /// starting button, timestamp, and grab position. Interactive grabs
    /// may not be stolen.
    pub fn update_grab(&mut self, device: DeviceId, handler: Box<dyn PointerGrab>) -> Result<()> {
        let Some(d) = self.devices.get_mut(&device) else {
            return Err(CoreError::state_error(format!("no such device {}", device)));
        };
        match d.grab.as_mut() {
            Some(grab) if grab.passive => {
                grab.handler = handler;
                grab.passive = false;
                Ok(())
            }
            Some(_) => Err(CoreError::state_error("interactive grab already active")),
            None => Err(CoreError::state_error("no grab to upgrade")),
        }
    }

    /// Tear down the active grab, giving the handler a final callback.
    pub fn end_grab(&mut self, device: DeviceId, time: u32) {
        let Some(grab) = self.devices.get_mut(&device).and_then(|d| d.grab.take()) else {
            return;
        };
        let mut handler = grab.handler;
        handler.end(self, device, time);
    }

    /// Run a closure against the active grab with the state re-borrowed.
    /// The grab is taken out of the device for the call and put back
    /// afterwards unless the handler ended it.
    fn with_grab(
        &mut self,
        device: DeviceId,
        f: impl FnOnce(&mut ActiveGrab, &mut CompositorState),
    ) {
        let Some(mut grab) = self.devices.get_mut(&device).and_then(|d| d.grab.take()) else {
            return;
        };
        f(&mut grab, self);
        if let Some(d) = self.devices.get_mut(&device) {
            if d.grab.is_none() {
                d.grab = Some(grab);
            }
        }
    }

    fn surface_client(&self, surface_id: u32) -> Option<wayland_server::Client> {
        self.surfaces
            .get(&surface_id)
            .and_then(|s| s.resource.as_ref())
            .and_then(|r| r.client())
    }

    pub fn send_motion(
        &self,
        device: DeviceId,
        surface_id: u32,
        time: u32,
        x: i32,
        y: i32,
        sx: i32,
        sy: i32,
    ) {
        let client = self.surface_client(surface_id);
        let Some(d) = self.devices.get(&device) else {
            return;
        };
        for res in &d.resources {
            if res.client() == client {
                res.motion(time, x, y, sx, sy);
            }
        }
    }

    pub fn send_button(
        &self,
        device: DeviceId,
        surface_id: u32,
        time: u32,
        button: u32,
        pressed: bool,
    ) {
        let client = self.surface_client(surface_id);
        let Some(d) = self.devices.get(&device) else {
            return;
        };
        for res in &d.resources {
            if res.client() == client {
                res.button(time, button, pressed as u32);
            }
        }
    }

    pub fn send_key(&self, device: DeviceId, surface_id: u32, time: u32, key: u32, pressed: bool) {
        let client = self.surface_client(surface_id);
        let Some(d) = self.devices.get(&device) else {
            return;
        };
        for res in &d.resources {
            if res.client() == client {
                res.key(time, key, pressed as u32);
            }
        }
    }

    fn send_pointer_focus(
        &self,
        device: DeviceId,
        target_surface: u32,
        time: u32,
        surface: Option<u32>,
        x: i32,
        y: i32,
        sx: i32,
        sy: i32,
    ) {
        let client = self.surface_client(target_surface);
        let surface_res = surface
            .and_then(|sid| self.surfaces.get(&sid))
            .and_then(|s| s.resource.clone());
        let Some(d) = self.devices.get(&device) else {
            return;
        };
        for res in &d.resources {
            if res.client() == client {
                res.pointer_focus(time, surface_res.as_ref(), x, y, sx, sy);
            }
        }
    }

    fn send_keyboard_focus(
        &self,
        device: DeviceId,
        target_surface: u32,
        time: u32,
        surface: Option<u32>,
    ) {
        let client = self.surface_client(target_surface);
        let surface_res = surface
            .and_then(|sid| self.surfaces.get(&sid))
            .and_then(|s| s.resource.clone());
        let Some(d) = self.devices.get(&device) else {
            return;
        };
        for res in &d.resources {
            if res.client() == client {
                res.keyboard_focus(time, surface_res.as_ref(), Vec::new());
            }
        }
    }
}
