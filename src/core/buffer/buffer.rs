//! Client buffers and their backing resources.
//!
//! A buffer owns a host texture plus the storage behind it: a read-only
//! shared-memory mapping, or a raw GL texture name imported from a DRM
//! buffer. Teardown is two-phase and the order is load-bearing: the
//! texture wrapper may still read the backing resource while it is being
//! released, so `release_front` must complete before `release_backing`.

use crate::core::buffer::format::PixelFormat;
use crate::core::render::host::{GlTextureName, GraphicsHost, TextureId};
use crate::core::wayland::protocol::wl_buffer::WlBuffer;

/// Storage behind a buffer's texture.
#[derive(Debug)]
pub enum BufferBacking {
    /// Memory-mapped client pixels. Unmapped only after the texture
    /// reading from it is gone.
    Shm { ptr: *mut libc::c_void, len: usize },
    /// A foreign GL texture name. The host's wrapper does not delete
    /// foreign names, so the buffer deletes it explicitly.
    Drm { gl_name: GlTextureName },
}

#[derive(Debug)]
pub struct Buffer {
    pub id: u32,
    pub width: i32,
    pub height: i32,
    pub stride: u32,
    pub format: PixelFormat,
    pub texture: Option<TextureId>,
    backing: Option<BufferBacking>,
    /// Shared-ownership count: the client handle plus one per attached
    /// surface. The backing resources are freed when it reaches zero.
    pub refs: usize,
    pub resource: Option<WlBuffer>,
}

impl Buffer {
    pub fn new(
        id: u32,
        width: i32,
        height: i32,
        stride: u32,
        format: PixelFormat,
        texture: TextureId,
        backing: BufferBacking,
    ) -> Self {
        Self {
            id,
            width,
            height,
            stride,
            format,
            texture: Some(texture),
            backing: Some(backing),
            refs: 1,
            resource: None,
        }
    }

    /// Per-kind attach hook. Wire-compat placeholder: the surface attach
    /// path already covers everything this would do.
    pub fn attach_hook(&self, _surface_id: u32) {}

    /// Per-kind damage hook. Damage propagation is an extension point;
    /// nothing consumes it yet.
    pub fn damage_hook(&self, surface_id: u32, x: i32, y: i32, width: i32, height: i32) {
        tracing::trace!(
            "buffer {} damage from surface {}: {},{} {}x{}",
            self.id, surface_id, x, y, width, height
        );
    }

    /// Phase one of teardown: drop the host texture wrapper.
    pub fn release_front(&mut self, host: &mut dyn GraphicsHost) {
        if let Some(tex) = self.texture.take() {
            host.destroy_texture(tex);
        }
    }

    /// Phase two of teardown: free the backing storage. Must only run
    /// after `release_front`.
    pub fn release_backing(&mut self, host: &mut dyn GraphicsHost) {
        debug_assert!(self.texture.is_none(), "backing released before texture");
        match self.backing.take() {
            Some(BufferBacking::Shm { ptr, len }) => {
                // SAFETY: ptr/len came from a successful mmap and nothing
                // reads the mapping once the texture wrapper is gone.
                unsafe {
                    libc::munmap(ptr, len);
                }
            }
            Some(BufferBacking::Drm { gl_name }) => {
                host.delete_texture_name(gl_name);
            }
            None => {}
        }
    }
}
