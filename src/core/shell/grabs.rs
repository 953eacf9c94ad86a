//! Interactive move and resize grab handlers.
//!
//! Both are layered on the input router's grab mechanism: the shell
//! request upgrades the implicit passive grab already held by the
//! pressing device. Move repositions the surface directly; resize only
//! posts configure events, because resizing is client-driven (the client
//! answers a configure by attaching a correctly-sized buffer).

use crate::core::input::device::DeviceId;
use crate::core::input::grab::PointerGrab;
use crate::core::state::CompositorState;

pub const EDGE_TOP: u32 = 1;
pub const EDGE_BOTTOM: u32 = 2;
pub const EDGE_LEFT: u32 = 4;
pub const EDGE_RIGHT: u32 = 8;

/// An edge mask is valid when it names at least one edge, stays within
/// the four edge bits, and never sets both bits of an opposite pair.
pub fn valid_resize_edges(edges: u32) -> bool {
    edges != 0
        && edges <= 15
        && (edges & (EDGE_TOP | EDGE_BOTTOM)) != (EDGE_TOP | EDGE_BOTTOM)
        && (edges & (EDGE_LEFT | EDGE_RIGHT)) != (EDGE_LEFT | EDGE_RIGHT)
}

/// Dimensions suggested by a resize grab: the grab-origin deltas grow or
/// shrink the starting size on whichever edges are being dragged.
pub fn resize_dimensions(
    edges: u32,
    grab_x: i32,
    grab_y: i32,
    x: i32,
    y: i32,
    start_width: i32,
    start_height: i32,
) -> (i32, i32) {
    let width = if edges & EDGE_LEFT != 0 {
        grab_x - x + start_width
    } else if edges & EDGE_RIGHT != 0 {
        x - grab_x + start_width
    } else {
        start_width
    };

    let height = if edges & EDGE_TOP != 0 {
        grab_y - y + start_height
    } else if edges & EDGE_BOTTOM != 0 {
        y - grab_y + start_height
    } else {
        start_height
    };

    (width, height)
}

/// Repositions the grabbed surface to pointer + press-time offset.
pub struct MoveGrab {
    pub dx: i32,
    pub dy: i32,
}

impl PointerGrab for MoveGrab {
    fn motion(&mut self, state: &mut CompositorState, device: DeviceId, _time: u32, x: i32, y: i32) {
        let Some(surface_id) = state.devices.get(&device).and_then(|d| d.pointer_focus) else {
            return;
        };
        state.move_surface(surface_id, x + self.dx, y + self.dy);
    }

    fn button(
        &mut self,
        _state: &mut CompositorState,
        _device: DeviceId,
        _time: u32,
        _button: u32,
        _pressed: bool,
    ) {
    }
}

/// Posts configure events with dimensions derived from the edge mask.
pub struct ResizeGrab {
    pub edges: u32,
    pub start_width: i32,
    pub start_height: i32,
}

impl PointerGrab for ResizeGrab {
    fn motion(&mut self, state: &mut CompositorState, device: DeviceId, time: u32, x: i32, y: i32) {
        let Some(dev) = state.devices.get(&device) else {
            return;
        };
        let Some(surface_id) = dev.pointer_focus else {
            return;
        };
        let (width, height) = resize_dimensions(
            self.edges,
            dev.grab_x,
            dev.grab_y,
            x,
            y,
            self.start_width,
            self.start_height,
        );
        state.send_shell_configure(surface_id, time, self.edges, width, height);
    }

    fn button(
        &mut self,
        _state: &mut CompositorState,
        _device: DeviceId,
        _time: u32,
        _button: u32,
        _pressed: bool,
    ) {
    }
}
