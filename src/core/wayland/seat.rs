use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch, Resource};

use crate::core::input::DeviceId;
use crate::core::state::CompositorState;
use crate::core::wayland::protocol::wl_input_device;
use crate::util::logging;

impl GlobalDispatch<wl_input_device::WlInputDevice, DeviceId> for CompositorState {
    fn bind(
        state: &mut Self,
        _handle: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<wl_input_device::WlInputDevice>,
        global_data: &DeviceId,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let device_id = *global_data;
        let handle = data_init.init(resource, device_id);
        if let Some(device) = state.devices.get_mut(&device_id) {
            device.add_resource(handle);
        }
        crate::mlog!(logging::INPUT, "input device {} bound", device_id);
    }
}

impl Dispatch<wl_input_device::WlInputDevice, DeviceId> for CompositorState {
    fn request(
        state: &mut Self,
        client: &wayland_server::Client,
        _resource: &wl_input_device::WlInputDevice,
        request: wl_input_device::Request,
        data: &DeviceId,
        _dhandle: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_input_device::Request::Attach { time, buffer, x, y } => {
                // Stale requests and requests from clients that do not
                // hold pointer focus are dropped.
                let Some(device) = state.devices.get(&*data) else {
                    return;
                };
                if time < device.pointer_focus_time {
                    return;
                }
                let Some(focus) = device.pointer_focus else {
                    return;
                };
                let owner = state
                    .surfaces
                    .get(&focus)
                    .and_then(|s| s.resource.as_ref())
                    .and_then(|r| r.client());
                if owner.as_ref() != Some(client) {
                    return;
                }
                // The pointer image itself is host-drawn; the request is
                // accepted but the buffer contents are not sampled.
                tracing::debug!(
                    "pointer image attach on device {}: buffer {:?} hotspot ({}, {})",
                    data,
                    buffer.as_ref().map(|b| b.id().protocol_id()),
                    x,
                    y
                );
            }
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &wl_input_device::WlInputDevice,
        data: &DeviceId,
    ) {
        if let Some(device) = state.devices.get_mut(data) {
            device.resources.retain(|r| r.id() != resource.id());
        }
    }
}
