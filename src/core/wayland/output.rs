use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch, Resource};

use crate::core::state::CompositorState;
use crate::core::wayland::protocol::wl_output;

impl GlobalDispatch<wl_output::WlOutput, u32> for CompositorState {
    fn bind(
        state: &mut Self,
        _handle: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<wl_output::WlOutput>,
        global_data: &u32,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let output_id = *global_data;
        let handle = data_init.init(resource, output_id);
        if let Some(output) = state.output_mut(output_id) {
            output.add_resource(handle);
        }
    }
}

impl Dispatch<wl_output::WlOutput, u32> for CompositorState {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &wl_output::WlOutput,
        _request: wl_output::Request,
        _data: &u32,
        _dhandle: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        // No requests at this interface revision.
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &wl_output::WlOutput,
        data: &u32,
    ) {
        if let Some(output) = state.output_mut(*data) {
            output.resources.retain(|r| r.id() != resource.id());
        }
    }
}
