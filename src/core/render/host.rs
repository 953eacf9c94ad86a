//! Graphics host abstraction.
//!
//! The compositor never talks to GL/EGL directly. Buffer contents become
//! textures through this trait, and the two-phase buffer teardown
//! (texture wrapper first, backing storage second) is expressed against
//! it so the ordering is visible to tests.

use crate::core::buffer::format::PixelFormat;

/// Opaque handle to a host texture wrapper.
pub type TextureId = u64;

/// Opaque handle to a transient imported image.
pub type ImageId = u64;

/// A raw GL texture name. The host does not delete foreign names on
/// wrapper destruction; the owner must delete them explicitly.
pub type GlTextureName = u32;

pub trait GraphicsHost {
    /// Wrap memory-mapped pixels as a texture. Returns None on failure.
    ///
    /// The memory must stay mapped for as long as the returned texture
    /// exists; callers enforce this with their teardown ordering.
    fn create_shm_texture(
        &mut self,
        width: u32,
        height: u32,
        stride: u32,
        format: PixelFormat,
        data: *const u8,
        len: usize,
    ) -> Option<TextureId>;

    /// Import a DRM buffer name as a transient image handle.
    fn import_drm_image(
        &mut self,
        name: u32,
        width: u32,
        height: u32,
        stride_pixels: u32,
    ) -> Option<ImageId>;

    /// Destroy a transient imported image. Textures bound from it remain
    /// valid.
    fn destroy_image(&mut self, image: ImageId);

    /// Allocate a raw GL texture name.
    fn allocate_texture_name(&mut self) -> GlTextureName;

    /// Bind an imported image to a GL texture name.
    fn bind_image(&mut self, tex: GlTextureName, image: ImageId);

    /// Wrap a foreign GL texture name as a host texture. The wrapper does
    /// not own deletion of the name.
    fn wrap_foreign_texture(
        &mut self,
        tex: GlTextureName,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Option<TextureId>;

    /// Delete a raw GL texture name.
    fn delete_texture_name(&mut self, tex: GlTextureName);

    /// Destroy a host texture wrapper.
    fn destroy_texture(&mut self, tex: TextureId);

    /// Concrete-type access for hosts that expose introspection.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Operations recorded by [`HeadlessGraphics`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsOp {
    CreateShmTexture(TextureId),
    ImportDrmImage(ImageId),
    DestroyImage(ImageId),
    AllocateTextureName(GlTextureName),
    BindImage(GlTextureName, ImageId),
    WrapForeignTexture(TextureId),
    DeleteTextureName(GlTextureName),
    DestroyTexture(TextureId),
}

/// A graphics host with no GPU behind it.
///
/// Hands out sequential handles and records every call, which is enough
/// for headless operation and for asserting teardown order.
#[derive(Debug, Default)]
pub struct HeadlessGraphics {
    next_texture: TextureId,
    next_image: ImageId,
    next_name: GlTextureName,
    /// When set, texture creation reports failure.
    pub fail_textures: bool,
    /// When set, DRM image import reports failure.
    pub fail_imports: bool,
    pub ops: Vec<GraphicsOp>,
}

impl HeadlessGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures created but not yet destroyed.
    pub fn live_textures(&self) -> usize {
        let created = self
            .ops
            .iter()
            .filter(|op| {
                matches!(op, GraphicsOp::CreateShmTexture(_) | GraphicsOp::WrapForeignTexture(_))
            })
            .count();
        let destroyed = self
            .ops
            .iter()
            .filter(|op| matches!(op, GraphicsOp::DestroyTexture(_)))
            .count();
        created - destroyed
    }
}

impl GraphicsHost for HeadlessGraphics {
    fn create_shm_texture(
        &mut self,
        _width: u32,
        _height: u32,
        _stride: u32,
        _format: PixelFormat,
        _data: *const u8,
        _len: usize,
    ) -> Option<TextureId> {
        if self.fail_textures {
            return None;
        }
        self.next_texture += 1;
        self.ops.push(GraphicsOp::CreateShmTexture(self.next_texture));
        Some(self.next_texture)
    }

    fn import_drm_image(
        &mut self,
        _name: u32,
        _width: u32,
        _height: u32,
        _stride_pixels: u32,
    ) -> Option<ImageId> {
        if self.fail_imports {
            return None;
        }
        self.next_image += 1;
        self.ops.push(GraphicsOp::ImportDrmImage(self.next_image));
        Some(self.next_image)
    }

    fn destroy_image(&mut self, image: ImageId) {
        self.ops.push(GraphicsOp::DestroyImage(image));
    }

    fn allocate_texture_name(&mut self) -> GlTextureName {
        self.next_name += 1;
        self.ops.push(GraphicsOp::AllocateTextureName(self.next_name));
        self.next_name
    }

    fn bind_image(&mut self, tex: GlTextureName, image: ImageId) {
        self.ops.push(GraphicsOp::BindImage(tex, image));
    }

    fn wrap_foreign_texture(
        &mut self,
        _tex: GlTextureName,
        _width: u32,
        _height: u32,
        _format: PixelFormat,
    ) -> Option<TextureId> {
        if self.fail_textures {
            return None;
        }
        self.next_texture += 1;
        self.ops.push(GraphicsOp::WrapForeignTexture(self.next_texture));
        Some(self.next_texture)
    }

    fn delete_texture_name(&mut self, tex: GlTextureName) {
        self.ops.push(GraphicsOp::DeleteTextureName(tex));
    }

    fn destroy_texture(&mut self, tex: TextureId) {
        self.ops.push(GraphicsOp::DestroyTexture(tex));
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
