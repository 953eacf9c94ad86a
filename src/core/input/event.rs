use crate::core::input::device::DeviceId;

/// An input event captured from the host toolkit, already resolved to a
/// stable device identifier and (for pointer events) the surface under
/// the cursor, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    KeyPress { device: DeviceId, time: u32, keycode: u32 },
    KeyRelease { device: DeviceId, time: u32, keycode: u32 },
    Motion { device: DeviceId, time: u32, x: i32, y: i32, source: Option<u32> },
    ButtonPress { device: DeviceId, time: u32, button: u32, source: Option<u32> },
    ButtonRelease { device: DeviceId, time: u32, button: u32, source: Option<u32> },
    Enter { device: DeviceId, time: u32, source: Option<u32> },
    Leave { device: DeviceId, time: u32, source: Option<u32> },
    Scroll { device: DeviceId, time: u32 },
}

/// Hardware keycodes are offset by 8 relative to protocol keycodes.
pub fn translate_keycode(hardware: u32) -> u32 {
    hardware.saturating_sub(8)
}

/// Toolkit button numbers map to evdev codes starting at BTN_LEFT (0x110).
pub fn translate_button(button: u32) -> u32 {
    button + 271
}
