//! Generated server bindings for the historic core interface tables.
//!
//! The request/event tables are fixed by the wire protocol; handler
//! implementations live in the sibling modules of `core::wayland`.

pub use wayland_backend;
pub use wayland_server;

pub mod __interfaces {
    wayland_scanner::generate_interfaces!("protocols/wayland-classic.xml");
}
use self::__interfaces::*;

wayland_scanner::generate_server_code!("protocols/wayland-classic.xml");
