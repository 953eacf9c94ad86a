use std::os::fd::{FromRawFd, OwnedFd};

use crate::core::input::event::HostEvent;
use crate::core::input::grab::PassiveGrab;
use crate::core::render::host::HeadlessGraphics;
use crate::core::state::CompositorState;
use crate::util::geometry::Rect;

fn shm_fd(len: usize) -> OwnedFd {
    unsafe {
        let fd = libc::memfd_create(b"madrona-test\0".as_ptr().cast(), 0);
        assert!(fd >= 0, "memfd_create failed");
        assert_eq!(libc::ftruncate(fd, len as libc::off_t), 0);
        OwnedFd::from_raw_fd(fd)
    }
}

fn new_state() -> CompositorState {
    let mut state = CompositorState::new(Box::new(HeadlessGraphics::new()));
    state.add_output(Rect::new(0, 0, 800, 600));
    state.add_device();
    state
}

/// A mapped 100x50 toplevel at (10, 20) with a buffer attached.
fn mapped_surface(state: &mut CompositorState) -> u32 {
    let surface = state.create_surface(None);
    state.surface_map_toplevel(surface);
    let fd = shm_fd(400 * 50);
    let buffer = state.create_shm_buffer(fd, 100, 50, 400, 0).unwrap();
    state.surface_attach(surface, buffer, 10, 20);
    surface
}

#[test]
fn test_attach_moves_and_sizes_surface() {
    let mut state = new_state();
    let surface = mapped_surface(&mut state);

    assert_eq!(state.surface_position(surface), Some((10, 20)));
    assert_eq!(state.surface_size(surface), Some((100, 50)));

    // Attach offsets are relative to the current position.
    let fd = shm_fd(400 * 50);
    let buffer = state.create_shm_buffer(fd, 100, 50, 400, 0).unwrap();
    state.surface_attach(surface, buffer, -5, 5);
    assert_eq!(state.surface_position(surface), Some((5, 25)));
}

#[test]
fn test_reattach_releases_old_buffer() {
    let mut state = new_state();
    let surface = state.create_surface(None);
    let b1 = state.create_shm_buffer(shm_fd(400 * 50), 100, 50, 400, 0).unwrap();
    let b2 = state.create_shm_buffer(shm_fd(400 * 50), 100, 50, 400, 0).unwrap();

    state.surface_attach(surface, b1, 0, 0);
    assert_eq!(state.buffers.get(&b1).unwrap().refs, 2);

    state.surface_attach(surface, b2, 0, 0);
    // The surface reference moved; only the client handle remains.
    assert_eq!(state.buffers.get(&b1).unwrap().refs, 1);
    assert_eq!(state.buffers.get(&b2).unwrap().refs, 2);

    // Client destroys its handle; the buffer goes away entirely.
    state.buffer_unref(b1);
    assert!(state.buffers.get(&b1).is_none());
}

#[test]
fn test_reattach_same_buffer_keeps_it_alive() {
    let mut state = new_state();
    let surface = state.create_surface(None);
    let buffer = state.create_shm_buffer(shm_fd(400 * 50), 100, 50, 400, 0).unwrap();

    state.surface_attach(surface, buffer, 0, 0);
    state.surface_attach(surface, buffer, 0, 0);

    assert_eq!(state.buffers.get(&buffer).unwrap().refs, 2);
}

#[test]
fn test_surface_destroy_releases_buffer() {
    let mut state = new_state();
    let surface = state.create_surface(None);
    let buffer = state.create_shm_buffer(shm_fd(400 * 50), 100, 50, 400, 0).unwrap();
    state.surface_attach(surface, buffer, 0, 0);

    state.destroy_surface(surface, 0);
    assert_eq!(state.buffers.get(&buffer).unwrap().refs, 1);
}

#[test]
fn test_motion_sets_pointer_focus() {
    let mut state = new_state();
    let surface = mapped_surface(&mut state);
    let device = 1;

    let handled = state.route_event(HostEvent::Motion { device, time: 5, x: 50, y: 40, source: None });
    assert!(handled);
    assert_eq!(state.devices.get(&device).unwrap().pointer_focus, Some(surface));

    // Motion over empty space is left to the host's default handling
    // and the focus bookkeeping stays put.
    let handled = state.route_event(HostEvent::Motion { device, time: 6, x: 500, y: 500, source: None });
    assert!(!handled);
    assert_eq!(state.devices.get(&device).unwrap().pointer_focus, Some(surface));
}

#[test]
fn test_unmapped_surface_is_not_picked() {
    let mut state = new_state();
    let surface = state.create_surface(None);
    let buffer = state.create_shm_buffer(shm_fd(400 * 50), 100, 50, 400, 0).unwrap();
    state.surface_attach(surface, buffer, 10, 20);

    assert_eq!(state.pick_surface(50, 40), None);
}

#[test]
fn test_button_press_grabs_raises_and_focuses() {
    let mut state = new_state();
    let below = mapped_surface(&mut state);
    let above = mapped_surface(&mut state);
    let device = 1;

    // Press on the lower surface (both overlap; `above` wins the pick
    // until `below` is raised).
    state.route_event(HostEvent::Motion { device, time: 5, x: 50, y: 40, source: Some(below) });
    state.route_event(HostEvent::ButtonPress { device, time: 6, button: 1, source: None });

    let d = state.devices.get(&device).unwrap();
    assert!(d.has_grab());
    assert_eq!(d.keyboard_focus, Some(below));

    let root = state.primary_output().unwrap().node;
    let below_node = state.surface(below).unwrap().node;
    assert_eq!(state.scene.node(root).unwrap().children.last(), Some(&below_node));
    let _ = above;

    state.route_event(HostEvent::ButtonRelease { device, time: 7, button: 1, source: None });
    assert!(!state.devices.get(&device).unwrap().has_grab());
}

#[test]
fn test_grab_holds_pointer_focus() {
    let mut state = new_state();
    let surface = mapped_surface(&mut state);
    let device = 1;

    state.route_event(HostEvent::Motion { device, time: 5, x: 50, y: 40, source: None });
    state.route_event(HostEvent::ButtonPress { device, time: 6, button: 1, source: None });

    // Dragging off the surface must not drop focus mid-grab.
    state.route_event(HostEvent::Motion { device, time: 7, x: 500, y: 500, source: None });
    assert_eq!(state.devices.get(&device).unwrap().pointer_focus, Some(surface));

    state.route_event(HostEvent::ButtonRelease { device, time: 8, button: 1, source: None });
    assert!(!state.devices.get(&device).unwrap().has_grab());
    assert_eq!(state.devices.get(&device).unwrap().pointer_focus, Some(surface));
}

#[test]
fn test_release_of_other_button_keeps_grab() {
    let mut state = new_state();
    let _surface = mapped_surface(&mut state);
    let device = 1;

    state.route_event(HostEvent::Motion { device, time: 5, x: 50, y: 40, source: None });
    state.route_event(HostEvent::ButtonPress { device, time: 6, button: 1, source: None });
    state.route_event(HostEvent::ButtonRelease { device, time: 7, button: 2, source: None });

    assert!(state.devices.get(&device).unwrap().has_grab());
}

#[test]
fn test_only_one_grab_per_device() {
    let mut state = new_state();
    let _surface = mapped_surface(&mut state);
    let device = 1;

    state.start_grab(device, Box::new(PassiveGrab), 272, 1, true).unwrap();
    assert!(state.start_grab(device, Box::new(PassiveGrab), 273, 2, true).is_err());
}

#[test]
fn test_shell_move_upgrades_grab() {
    let mut state = new_state();
    let surface = mapped_surface(&mut state);
    let device = 1;

    state.route_event(HostEvent::Motion { device, time: 5, x: 50, y: 40, source: None });
    state.route_event(HostEvent::ButtonPress { device, time: 6, button: 1, source: None });

    state.shell_move(surface, device, 6);
    let d = state.devices.get(&device).unwrap();
    assert!(d.grab.as_ref().is_some_and(|g| !g.passive));

    // Dragging by (30, 10) carries the surface along.
    state.route_event(HostEvent::Motion { device, time: 7, x: 80, y: 50, source: None });
    assert_eq!(state.surface_position(surface), Some((40, 30)));

    state.route_event(HostEvent::ButtonRelease { device, time: 8, button: 1, source: None });
    assert!(!state.devices.get(&device).unwrap().has_grab());
}

#[test]
fn test_shell_move_with_stale_time_is_ignored() {
    let mut state = new_state();
    let surface = mapped_surface(&mut state);
    let device = 1;

    state.route_event(HostEvent::Motion { device, time: 5, x: 50, y: 40, source: None });
    state.route_event(HostEvent::ButtonPress { device, time: 6, button: 1, source: None });

    state.shell_move(surface, device, 99);
    assert!(state.devices.get(&device).unwrap().grab.as_ref().is_some_and(|g| g.passive));
}

#[test]
fn test_shell_move_without_grab_is_ignored() {
    let mut state = new_state();
    let surface = mapped_surface(&mut state);

    state.shell_move(surface, 1, 6);
    assert!(!state.devices.get(&1).unwrap().has_grab());
}

#[test]
fn test_shell_resize_rejects_invalid_edges() {
    let mut state = new_state();
    let surface = mapped_surface(&mut state);
    let device = 1;

    state.route_event(HostEvent::Motion { device, time: 5, x: 50, y: 40, source: None });
    state.route_event(HostEvent::ButtonPress { device, time: 6, button: 1, source: None });

    // Opposite edges set together; the implicit grab stays as it was.
    state.shell_resize(surface, device, 6, 3);
    assert!(state.devices.get(&device).unwrap().grab.as_ref().is_some_and(|g| g.passive));
}

#[test]
fn test_shell_resize_upgrades_grab() {
    let mut state = new_state();
    let surface = mapped_surface(&mut state);
    let device = 1;

    state.route_event(HostEvent::Motion { device, time: 5, x: 50, y: 40, source: None });
    state.route_event(HostEvent::ButtonPress { device, time: 6, button: 1, source: None });

    state.shell_resize(surface, device, 6, 10);
    assert!(state.devices.get(&device).unwrap().grab.as_ref().is_some_and(|g| !g.passive));
}

#[test]
fn test_destroy_clears_focus() {
    let mut state = new_state();
    let surface = mapped_surface(&mut state);
    let device = 1;

    state.route_event(HostEvent::Motion { device, time: 5, x: 50, y: 40, source: None });
    state.route_event(HostEvent::ButtonPress { device, time: 6, button: 1, source: None });
    state.route_event(HostEvent::ButtonRelease { device, time: 7, button: 1, source: None });
    assert_eq!(state.devices.get(&device).unwrap().keyboard_focus, Some(surface));

    state.destroy_surface(surface, 8);
    let d = state.devices.get(&device).unwrap();
    assert_eq!(d.pointer_focus, None);
    assert_eq!(d.keyboard_focus, None);
}

#[test]
fn test_output_close_request_queues_event() {
    let mut state = new_state();
    state.request_output_close(1);

    assert!(state.output(1).unwrap().close_requested);
    assert!(!state.take_events().is_empty());
    assert!(state.take_events().is_empty());
}
