//! Pointer grabs.
//!
//! A grab overrides normal focus-based routing: while one is active,
//! motion and button events on the device go exclusively to the grab
//! handler until the starting button is released.

use crate::core::input::device::DeviceId;
use crate::core::state::CompositorState;

/// Handler for an active grab. Implementations receive the compositor
/// state re-borrowed, since the grab itself is taken out of the device
/// for the duration of the call.
pub trait PointerGrab {
    fn motion(&mut self, state: &mut CompositorState, device: DeviceId, time: u32, x: i32, y: i32);
    fn button(
        &mut self,
        state: &mut CompositorState,
        device: DeviceId,
        time: u32,
        button: u32,
        pressed: bool,
    );
    fn end(&mut self, _state: &mut CompositorState, _device: DeviceId, _time: u32) {}
}

/// An installed grab plus the button press that started it.
pub struct ActiveGrab {
    pub handler: Box<dyn PointerGrab>,
    pub button: u32,
    pub time: u32,
    /// Passive grabs (the implicit press-to-release grab) may be
    /// upgraded in place by shell move/resize; interactive grabs may not.
    pub passive: bool,
}

/// The implicit grab installed on button press: deliver motion and
/// button events to whichever surface holds pointer focus.
pub struct PassiveGrab;

impl PointerGrab for PassiveGrab {
    fn motion(&mut self, state: &mut CompositorState, device: DeviceId, time: u32, x: i32, y: i32) {
        let Some(surface_id) = state.devices.get(&device).and_then(|d| d.pointer_focus) else {
            return;
        };
        let (sx, sy) = state.surface_local(surface_id, x, y);
        state.send_motion(device, surface_id, time, x, y, sx, sy);
    }

    fn button(
        &mut self,
        state: &mut CompositorState,
        device: DeviceId,
        time: u32,
        button: u32,
        pressed: bool,
    ) {
        let Some(surface_id) = state.devices.get(&device).and_then(|d| d.pointer_focus) else {
            return;
        };
        state.send_button(device, surface_id, time, button, pressed);
    }
}
