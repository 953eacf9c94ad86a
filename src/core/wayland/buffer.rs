use wayland_server::{Dispatch, DisplayHandle};

use crate::core::state::CompositorState;
use crate::core::wayland::protocol::wl_buffer;

impl Dispatch<wl_buffer::WlBuffer, u32> for CompositorState {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &wl_buffer::WlBuffer,
        request: wl_buffer::Request,
        _data: &u32,
        _dhandle: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_buffer::Request::Destroy => {}
        }
    }

    /// The client reference goes away with the handle; surfaces still
    /// holding the buffer keep it alive through their own references.
    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &wl_buffer::WlBuffer,
        data: &u32,
    ) {
        state.buffer_unref(*data);
    }
}
