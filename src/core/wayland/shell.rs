use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch, Resource};

use crate::core::input::DeviceId;
use crate::core::state::CompositorState;
use crate::core::wayland::protocol::{wl_drag, wl_shell};

impl GlobalDispatch<wl_shell::WlShell, ()> for CompositorState {
    fn bind(
        state: &mut Self,
        _handle: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<wl_shell::WlShell>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let shell = data_init.init(resource, ());
        state.shell_resources.push(shell);
    }
}

impl Dispatch<wl_shell::WlShell, ()> for CompositorState {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &wl_shell::WlShell,
        request: wl_shell::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_shell::Request::Move { surface, input_device, time } => {
                let surface_id = *surface.data::<u32>().unwrap_or(&0);
                let device = *input_device.data::<DeviceId>().unwrap_or(&0);
                state.shell_move(surface_id, device, time);
            }
            wl_shell::Request::Resize { surface, input_device, time, edges } => {
                let surface_id = *surface.data::<u32>().unwrap_or(&0);
                let device = *input_device.data::<DeviceId>().unwrap_or(&0);
                state.shell_resize(surface_id, device, time, edges);
            }
            wl_shell::Request::CreateDrag { id } => {
                // Drag and drop is not wired up; the object only exists
                // so the client can destroy it cleanly.
                data_init.init(id, ());
                tracing::warn!("create_drag is not implemented");
            }
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &wl_shell::WlShell,
        _data: &(),
    ) {
        state.shell_resources.retain(|s| s.id() != resource.id());
    }
}

impl Dispatch<wl_drag::WlDrag, ()> for CompositorState {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &wl_drag::WlDrag,
        request: wl_drag::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_drag::Request::Destroy => {}
        }
    }
}
