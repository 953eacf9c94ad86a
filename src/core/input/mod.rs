pub mod device;
pub mod event;
pub mod grab;

pub use device::{DeviceId, InputDevice};
pub use event::HostEvent;
pub use grab::{ActiveGrab, PassiveGrab, PointerGrab};
