use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch};

use crate::core::state::CompositorState;
use crate::core::wayland::protocol::{wl_buffer, wl_shm};
use crate::util::logging;

impl GlobalDispatch<wl_shm::WlShm, ()> for CompositorState {
    fn bind(
        _state: &mut Self,
        _handle: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<wl_shm::WlShm>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        data_init.init(resource, ());
    }
}

impl Dispatch<wl_shm::WlShm, ()> for CompositorState {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &wl_shm::WlShm,
        request: wl_shm::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_shm::Request::CreateBuffer { id, fd, width, height, stride, visual } => {
                // The object must exist on the wire even when creation
                // fails; an id with no table entry is an inert handle.
                let internal_id = state.next_buffer_id();
                let buffer: wl_buffer::WlBuffer = data_init.init(id, internal_id);
                match state.create_shm_buffer_with_id(internal_id, fd, width, height, stride, visual)
                {
                    Ok(()) => state.set_buffer_resource(internal_id, buffer),
                    Err(err) => {
                        crate::mlog!(logging::BUFFER, "shm create_buffer failed: {}", err);
                    }
                }
            }
        }
    }
}
