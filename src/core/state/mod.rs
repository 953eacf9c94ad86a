//! Global compositor state.
//!
//! `CompositorState` owns the whole object graph: surfaces, buffers,
//! input devices, outputs, and the scene they are composited into. All
//! mutation happens synchronously inside dispatch callbacks, so the
//! discipline here is single-threaded ownership, not locking.
//!
//! Impl blocks are split by concern into the sibling modules:
//! `surfaces`, `buffers`, `input`, and `shell`.

use crate::core::compositor::CompositorEvent;
use crate::core::buffer::Buffer;
use crate::core::input::device::{DeviceId, InputDevice};
use crate::core::output::Output;
use crate::core::render::host::GraphicsHost;
use crate::core::render::scene::Scene;
use crate::core::surface::Surface;
use crate::core::time::Clock;
use crate::core::wayland::protocol::wl_shell::WlShell;
use crate::prelude::HashMap;
use crate::util::geometry::Rect;

// Sub-modules containing extracted CompositorState impl blocks
mod buffers;
mod input;
mod shell;
mod surfaces;

#[cfg(test)]
mod tests;

/// Authentication collaborator for the DRM buffer path.
///
/// Wraps the windowing transport's authentication round-trip and the
/// device node it advertises. When absent, the drm global is not
/// registered and clients fall back to shared memory.
pub trait DrmDevice {
    fn authenticate(&mut self, magic: u32) -> bool;
    fn device_path(&self) -> &str;
}

/// A DRM device with a fixed path and canned authentication answer.
pub struct StubDrmDevice {
    pub path: String,
    pub accept: bool,
}

impl StubDrmDevice {
    pub fn new(path: impl Into<String>, accept: bool) -> Self {
        Self { path: path.into(), accept }
    }
}

impl DrmDevice for StubDrmDevice {
    fn authenticate(&mut self, _magic: u32) -> bool {
        self.accept
    }

    fn device_path(&self) -> &str {
        &self.path
    }
}

pub struct CompositorState {
    pub graphics: Box<dyn GraphicsHost>,
    pub drm: Option<Box<dyn DrmDevice>>,
    pub scene: Scene,
    pub surfaces: HashMap<u32, Surface>,
    pub buffers: HashMap<u32, Buffer>,
    pub devices: HashMap<DeviceId, InputDevice>,
    pub outputs: Vec<Output>,
    /// Bound shell handles; configure events go to the handle owned by
    /// the target surface's client.
    pub shell_resources: Vec<WlShell>,
    /// Events for the host platform, drained by the compositor.
    pub pending_events: Vec<CompositorEvent>,
    pub clock: Clock,
    next_surface_id: u32,
    next_buffer_id: u32,
    next_output_id: u32,
    next_device_id: DeviceId,
}

impl CompositorState {
    pub fn new(graphics: Box<dyn GraphicsHost>) -> Self {
        Self {
            graphics,
            drm: None,
            scene: Scene::new(),
            surfaces: HashMap::new(),
            buffers: HashMap::new(),
            devices: HashMap::new(),
            outputs: Vec::new(),
            shell_resources: Vec::new(),
            pending_events: Vec::new(),
            clock: Clock::new(),
            next_surface_id: 0,
            next_buffer_id: 0,
            next_output_id: 0,
            next_device_id: 0,
        }
    }

    pub fn with_drm(mut self, drm: Box<dyn DrmDevice>) -> Self {
        self.drm = Some(drm);
        self
    }

    pub fn next_surface_id(&mut self) -> u32 {
        self.next_surface_id += 1;
        self.next_surface_id
    }

    pub fn next_buffer_id(&mut self) -> u32 {
        self.next_buffer_id += 1;
        self.next_buffer_id
    }

    /// Register a rendering destination. Its container node parents all
    /// surface nodes composited onto it.
    pub fn add_output(&mut self, rect: Rect) -> u32 {
        self.next_output_id += 1;
        let id = self.next_output_id;
        let node = self.scene.create_node();
        if let Some(n) = self.scene.node_mut(node) {
            n.set_position(rect.x, rect.y);
            n.set_size(rect.width, rect.height);
            n.visible = true;
        }
        self.outputs.push(Output::new(id, node, rect));
        id
    }

    /// Register a pointer/keyboard pseudo-device.
    pub fn add_device(&mut self) -> DeviceId {
        self.next_device_id += 1;
        let id = self.next_device_id;
        self.devices.insert(id, InputDevice::new(id));
        id
    }

    pub fn output(&self, id: u32) -> Option<&Output> {
        self.outputs.iter().find(|o| o.id == id)
    }

    pub fn output_mut(&mut self, id: u32) -> Option<&mut Output> {
        self.outputs.iter_mut().find(|o| o.id == id)
    }

    /// The output new surfaces are composited onto.
    pub fn primary_output(&self) -> Option<&Output> {
        self.outputs.first()
    }

    /// Update an output's geometry. Fullscreen surfaces anchored to its
    /// container pick the change up on the layout pass.
    pub fn set_output_geometry(&mut self, id: u32, rect: Rect) {
        let Some(node) = self.output(id).map(|o| o.node) else {
            return;
        };
        if let Some(output) = self.output_mut(id) {
            output.rect = rect;
            for res in &output.resources {
                res.geometry(rect.x, rect.y, rect.width as i32, rect.height as i32);
            }
        }
        if let Some(n) = self.scene.node_mut(node) {
            n.set_position(rect.x, rect.y);
            n.set_size(rect.width, rect.height);
        }
        self.scene.layout();
    }

    /// The host window was asked to close.
    pub fn request_output_close(&mut self, id: u32) {
        if let Some(output) = self.output_mut(id) {
            output.close_requested = true;
        }
        self.push_event(CompositorEvent::OutputCloseRequested { output_id: id });
    }

    pub fn push_event(&mut self, event: CompositorEvent) {
        self.pending_events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<CompositorEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
