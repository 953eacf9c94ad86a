//! Buffer creation and reference management.
//!
//! Buffers are created against the graphics host and tracked in an
//! explicit id table with a shared-ownership count: one reference for
//! the client handle, one per attached surface. The last release tears
//! the buffer down in two ordered phases.

use std::os::fd::{AsRawFd, OwnedFd};

use crate::core::buffer::buffer::{Buffer, BufferBacking};
use crate::core::buffer::format::Visual;
use crate::core::errors::{CoreError, Result};
use crate::core::state::CompositorState;
use crate::core::wayland::protocol::wl_buffer::WlBuffer;
use crate::util::logging;

impl CompositorState {
    /// Create a buffer backed by a memory-mapped fd.
    ///
    /// The fd is consumed: it is closed before this returns, success or
    /// failure, so the caller must not reuse it.
    pub fn create_shm_buffer(
        &mut self,
        fd: OwnedFd,
        width: i32,
        height: i32,
        stride: u32,
        visual: u32,
    ) -> Result<u32> {
        let id = self.next_buffer_id();
        self.create_shm_buffer_with_id(id, fd, width, height, stride, visual)?;
        Ok(id)
    }

    pub(crate) fn create_shm_buffer_with_id(
        &mut self,
        id: u32,
        fd: OwnedFd,
        width: i32,
        height: i32,
        stride: u32,
        visual: u32,
    ) -> Result<()> {
        let format = Self::resolve_buffer_format(width, height, visual)?;

        let len = stride as usize * height as usize;
        // SAFETY: read-only shared mapping of a client-provided fd; the
        // pointer is validated against MAP_FAILED below.
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ,
                libc::MAP_SHARED,
                fd.as_raw_fd(),
                0,
            )
        };
        // The fd is closed in all outcomes.
        drop(fd);
        if ptr == libc::MAP_FAILED {
            return Err(CoreError::MapFailed(
                std::io::Error::last_os_error().to_string(),
            ));
        }

        let texture = match self.graphics.create_shm_texture(
            width as u32,
            height as u32,
            stride,
            format,
            ptr as *const u8,
            len,
        ) {
            Some(texture) => texture,
            None => {
                // The texture never existed, so the mapping can go
                // directly.
                unsafe {
                    libc::munmap(ptr, len);
                }
                return Err(CoreError::TextureFailed);
            }
        };

        crate::mlog!(logging::BUFFER, "shm buffer {}: {}x{} stride={}", id, width, height, stride);
        self.buffers.insert(
            id,
            Buffer::new(id, width, height, stride, format, texture, BufferBacking::Shm { ptr, len }),
        );
        Ok(())
    }

    /// Create a buffer by importing a DRM buffer name.
    pub fn create_drm_buffer(
        &mut self,
        name: u32,
        width: i32,
        height: i32,
        stride: u32,
        visual: u32,
    ) -> Result<u32> {
        let id = self.next_buffer_id();
        self.create_drm_buffer_with_id(id, name, width, height, stride, visual)?;
        Ok(id)
    }

    pub(crate) fn create_drm_buffer_with_id(
        &mut self,
        id: u32,
        name: u32,
        width: i32,
        height: i32,
        stride: u32,
        visual: u32,
    ) -> Result<()> {
        let format = Self::resolve_buffer_format(width, height, visual)?;

        // Stride arrives in bytes; the import path wants pixels.
        let image = self
            .graphics
            .import_drm_image(name, width as u32, height as u32, stride / 4)
            .ok_or(CoreError::ImportFailed(name))?;

        let gl_name = self.graphics.allocate_texture_name();
        self.graphics.bind_image(gl_name, image);
        // The import handle is transient; the bound texture keeps the
        // contents alive.
        self.graphics.destroy_image(image);

        let texture = match self.graphics.wrap_foreign_texture(gl_name, width as u32, height as u32, format)
        {
            Some(texture) => texture,
            None => {
                // No wrapper was created, so the raw name is deleted
                // directly.
                self.graphics.delete_texture_name(gl_name);
                return Err(CoreError::TextureFailed);
            }
        };

        crate::mlog!(logging::BUFFER, "drm buffer {}: name={} {}x{}", id, name, width, height);
        self.buffers.insert(
            id,
            Buffer::new(id, width, height, stride, format, texture, BufferBacking::Drm { gl_name }),
        );
        Ok(())
    }

    fn resolve_buffer_format(
        width: i32,
        height: i32,
        visual: u32,
    ) -> Result<crate::core::buffer::format::PixelFormat> {
        if width < 0 || height < 0 {
            return Err(CoreError::InvalidBufferSize(width, height));
        }
        let visual = Visual::from_wire(visual).ok_or(CoreError::UnsupportedVisual(visual))?;
        Ok(visual.pixel_format())
    }

    pub fn set_buffer_resource(&mut self, id: u32, resource: WlBuffer) {
        if let Some(buffer) = self.buffers.get_mut(&id) {
            buffer.resource = Some(resource);
        }
    }

    /// Take a reference on a buffer (a surface is attaching it).
    pub fn buffer_ref(&mut self, id: u32) {
        if let Some(buffer) = self.buffers.get_mut(&id) {
            buffer.refs += 1;
        }
    }

    /// Drop a reference. On the last one the texture wrapper is
    /// destroyed first and the backing storage second; any number of
    /// surfaces may still have held references up to this point.
    pub fn buffer_unref(&mut self, id: u32) {
        let Some(buffer) = self.buffers.get_mut(&id) else {
            // Creation may have failed after the protocol object was
            // set up; nothing to release.
            return;
        };
        buffer.refs -= 1;
        if buffer.refs > 0 {
            return;
        }
        if let Some(mut buffer) = self.buffers.remove(&id) {
            tracing::debug!("buffer {} released, tearing down backing", id);
            buffer.release_front(self.graphics.as_mut());
            buffer.release_backing(self.graphics.as_mut());
        }
    }
}
