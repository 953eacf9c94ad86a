use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch, Resource};

use crate::core::state::CompositorState;
use crate::core::wayland::protocol::{wl_buffer, wl_drm};
use crate::util::logging;

impl GlobalDispatch<wl_drm::WlDrm, ()> for CompositorState {
    fn bind(
        state: &mut Self,
        _handle: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<wl_drm::WlDrm>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let drm = data_init.init(resource, ());
        // Advertise the device node immediately so the client can open
        // it and start the authentication round-trip.
        if let Some(device) = state.drm.as_ref() {
            drm.device(device.device_path().to_string());
        }
    }
}

impl Dispatch<wl_drm::WlDrm, ()> for CompositorState {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &wl_drm::WlDrm,
        request: wl_drm::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_drm::Request::Authenticate { magic } => {
                let ok = match state.drm.as_mut() {
                    Some(device) => device.authenticate(magic),
                    None => false,
                };
                if ok {
                    resource.authenticated();
                    crate::mlog!(logging::DRM, "client authenticated (magic {:#x})", magic);
                } else {
                    resource.post_error(wl_drm::Error::InvalidObject, "authentication failed");
                }
            }
            wl_drm::Request::CreateBuffer { id, name, width, height, stride, visual } => {
                let internal_id = state.next_buffer_id();
                let buffer: wl_buffer::WlBuffer = data_init.init(id, internal_id);
                match state
                    .create_drm_buffer_with_id(internal_id, name, width, height, stride, visual)
                {
                    Ok(()) => state.set_buffer_resource(internal_id, buffer),
                    Err(err) => {
                        // The husk handle stays inert; lookups on its id
                        // are no-ops.
                        crate::mlog!(logging::DRM, "drm create_buffer failed: {}", err);
                    }
                }
            }
        }
    }
}
