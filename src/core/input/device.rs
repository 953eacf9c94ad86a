use crate::core::input::grab::ActiveGrab;
use crate::core::wayland::protocol::wl_input_device::WlInputDevice;

/// Stable identifier for a host input device.
///
/// The host toolkit's device objects are looked up in an explicit
/// `DeviceId -> InputDevice` table owned by the compositor state.
pub type DeviceId = u32;

/// Per-device pointer/keyboard state.
pub struct InputDevice {
    pub id: DeviceId,
    /// Last known pointer position in scene-global coordinates.
    pub x: i32,
    pub y: i32,
    pub pointer_focus: Option<u32>,
    pub pointer_focus_time: u32,
    pub keyboard_focus: Option<u32>,
    pub grab: Option<ActiveGrab>,
    /// Pointer position captured when the current grab started.
    pub grab_x: i32,
    pub grab_y: i32,
    /// Client handles bound to this device; events are delivered to the
    /// handle owned by the target surface's client.
    pub resources: Vec<WlInputDevice>,
}

impl InputDevice {
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            x: 0,
            y: 0,
            pointer_focus: None,
            pointer_focus_time: 0,
            keyboard_focus: None,
            grab: None,
            grab_x: 0,
            grab_y: 0,
            resources: Vec::new(),
        }
    }

    pub fn has_grab(&self) -> bool {
        self.grab.is_some()
    }

    pub fn add_resource(&mut self, resource: WlInputDevice) {
        self.resources.push(resource);
    }
}
