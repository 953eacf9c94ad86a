use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch, Resource};

use crate::core::state::CompositorState;
use crate::core::wayland::protocol::{wl_compositor, wl_surface};
use crate::util::logging;

impl GlobalDispatch<wl_compositor::WlCompositor, ()> for CompositorState {
    fn bind(
        _state: &mut Self,
        _handle: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<wl_compositor::WlCompositor>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        data_init.init(resource, ());
        crate::mlog!(logging::COMPOSITOR, "compositor bound");
    }
}

impl Dispatch<wl_compositor::WlCompositor, ()> for CompositorState {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &wl_compositor::WlCompositor,
        request: wl_compositor::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_compositor::Request::CreateSurface { id } => {
                let internal_id = state.next_surface_id();
                let surface = data_init.init(id, internal_id);
                state.insert_surface(internal_id, Some(surface));
            }
        }
    }
}

impl Dispatch<wl_surface::WlSurface, u32> for CompositorState {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &wl_surface::WlSurface,
        request: wl_surface::Request,
        data: &u32,
        _dhandle: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let id = *data;
        match request {
            wl_surface::Request::Destroy => {
                // Teardown happens in `destroyed` once the backend has
                // dropped the object.
            }
            wl_surface::Request::Attach { buffer, dx, dy } => {
                let buffer_id = *buffer.data::<u32>().unwrap_or(&0);
                state.surface_attach(id, buffer_id, dx, dy);
            }
            wl_surface::Request::MapToplevel => {
                state.surface_map_toplevel(id);
            }
            wl_surface::Request::MapTransient { parent, dx, dy, flags } => {
                let parent_id = *parent.data::<u32>().unwrap_or(&0);
                state.surface_map_transient(id, parent_id, dx, dy, flags);
            }
            wl_surface::Request::MapFullscreen => {
                state.surface_map_fullscreen(id);
            }
            wl_surface::Request::Damage { x, y, width, height } => {
                state.surface_damage(id, x, y, width, height);
            }
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &wl_surface::WlSurface,
        data: &u32,
    ) {
        let time = state.clock.now_ms();
        state.destroy_surface(*data, time);
    }
}
