use std::os::fd::{FromRawFd, OwnedFd};

use crate::core::buffer::format::{PixelFormat, Visual};
use crate::core::errors::CoreError;
use crate::core::render::host::{GraphicsOp, HeadlessGraphics};
use crate::core::state::CompositorState;

fn shm_fd(len: usize) -> OwnedFd {
    unsafe {
        let fd = libc::memfd_create(b"madrona-test\0".as_ptr().cast(), 0);
        assert!(fd >= 0, "memfd_create failed");
        assert_eq!(libc::ftruncate(fd, len as libc::off_t), 0);
        OwnedFd::from_raw_fd(fd)
    }
}

fn host(state: &CompositorState) -> &HeadlessGraphics {
    state.graphics.as_any().downcast_ref().unwrap()
}

fn new_state() -> CompositorState {
    CompositorState::new(Box::new(HeadlessGraphics::new()))
}

#[test]
fn test_shm_buffer_create() {
    let mut state = new_state();
    let fd = shm_fd(400 * 50);

    let id = state.create_shm_buffer(fd, 100, 50, 400, 0).unwrap();

    let buffer = state.buffers.get(&id).unwrap();
    assert_eq!((buffer.width, buffer.height), (100, 50));
    assert_eq!(buffer.stride, 400);
    assert_eq!(buffer.refs, 1);
    assert!(buffer.texture.is_some());
    assert_eq!(host(&state).live_textures(), 1);
}

#[test]
fn test_shm_buffer_rejects_negative_size() {
    let mut state = new_state();
    let fd = shm_fd(4096);

    let err = state.create_shm_buffer(fd, -1, 50, 400, 0).unwrap_err();
    assert!(matches!(err, CoreError::InvalidBufferSize(-1, 50)));
    assert!(state.buffers.is_empty());
}

#[test]
fn test_shm_buffer_rejects_unknown_visual() {
    let mut state = new_state();
    let fd = shm_fd(4096);

    let err = state.create_shm_buffer(fd, 10, 10, 40, 7).unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedVisual(7)));
}

#[test]
fn test_shm_texture_failure_leaves_no_buffer() {
    let mut graphics = HeadlessGraphics::new();
    graphics.fail_textures = true;
    let mut state = CompositorState::new(Box::new(graphics));
    let fd = shm_fd(400 * 50);

    let err = state.create_shm_buffer(fd, 100, 50, 400, 0).unwrap_err();
    assert!(matches!(err, CoreError::TextureFailed));
    assert!(state.buffers.is_empty());
    assert_eq!(host(&state).live_textures(), 0);
}

#[test]
fn test_shm_release_destroys_texture() {
    let mut state = new_state();
    let fd = shm_fd(400 * 50);
    let id = state.create_shm_buffer(fd, 100, 50, 400, 0).unwrap();
    let texture = state.buffers.get(&id).unwrap().texture.unwrap();

    state.buffer_unref(id);

    assert!(state.buffers.get(&id).is_none());
    assert!(host(&state).ops.contains(&GraphicsOp::DestroyTexture(texture)));
    assert_eq!(host(&state).live_textures(), 0);
}

#[test]
fn test_refcount_keeps_buffer_alive() {
    let mut state = new_state();
    let fd = shm_fd(400 * 50);
    let id = state.create_shm_buffer(fd, 100, 50, 400, 0).unwrap();

    state.buffer_ref(id);
    state.buffer_unref(id);
    assert!(state.buffers.get(&id).is_some());

    state.buffer_unref(id);
    assert!(state.buffers.get(&id).is_none());
}

#[test]
fn test_unref_unknown_buffer_is_ignored() {
    let mut state = new_state();
    state.buffer_unref(42);
    assert!(state.buffers.is_empty());
}

#[test]
fn test_drm_buffer_import_sequence() {
    let mut state = new_state();

    let id = state.create_drm_buffer(7, 64, 64, 256, 0).unwrap();

    // Import, bind to a fresh name, then drop the transient image before
    // wrapping; the texture outlives the import handle.
    let ops = &host(&state).ops;
    assert_eq!(
        ops.as_slice(),
        &[
            GraphicsOp::ImportDrmImage(1),
            GraphicsOp::AllocateTextureName(1),
            GraphicsOp::BindImage(1, 1),
            GraphicsOp::DestroyImage(1),
            GraphicsOp::WrapForeignTexture(1),
        ]
    );
    assert!(state.buffers.get(&id).is_some());
}

#[test]
fn test_drm_release_order_texture_before_name() {
    let mut state = new_state();
    let id = state.create_drm_buffer(7, 64, 64, 256, 0).unwrap();

    state.buffer_unref(id);

    let ops = &host(&state).ops;
    let destroy = ops
        .iter()
        .position(|op| matches!(op, GraphicsOp::DestroyTexture(_)))
        .unwrap();
    let delete = ops
        .iter()
        .position(|op| matches!(op, GraphicsOp::DeleteTextureName(_)))
        .unwrap();
    assert!(destroy < delete, "texture wrapper must go before the GL name");
}

#[test]
fn test_drm_import_failure() {
    let mut graphics = HeadlessGraphics::new();
    graphics.fail_imports = true;
    let mut state = CompositorState::new(Box::new(graphics));

    let err = state.create_drm_buffer(7, 64, 64, 256, 0).unwrap_err();
    assert!(matches!(err, CoreError::ImportFailed(7)));
    assert!(state.buffers.is_empty());
}

#[test]
fn test_drm_wrap_failure_deletes_name() {
    let mut graphics = HeadlessGraphics::new();
    graphics.fail_textures = true;
    let mut state = CompositorState::new(Box::new(graphics));

    let err = state.create_drm_buffer(7, 64, 64, 256, 0).unwrap_err();
    assert!(matches!(err, CoreError::TextureFailed));
    assert!(host(&state).ops.contains(&GraphicsOp::DeleteTextureName(1)));
}

#[test]
fn test_visual_wire_tokens() {
    assert_eq!(Visual::from_wire(0), Some(Visual::PremultipliedArgb));
    assert_eq!(Visual::from_wire(1), Some(Visual::Argb));
    assert_eq!(Visual::from_wire(2), Some(Visual::Rgb));
    assert_eq!(Visual::from_wire(3), None);
}

#[cfg(target_endian = "little")]
#[test]
fn test_visual_resolves_to_bgra_on_little_endian() {
    assert_eq!(Visual::PremultipliedArgb.pixel_format(), PixelFormat::Bgra8888Pre);
    assert_eq!(Visual::Argb.pixel_format(), PixelFormat::Bgra8888);
    assert_eq!(Visual::Rgb.pixel_format(), PixelFormat::Bgr888);
}

#[test]
fn test_pixel_format_sizes() {
    assert_eq!(PixelFormat::Bgra8888.bytes_per_pixel(), 4);
    assert_eq!(PixelFormat::Bgr888.bytes_per_pixel(), 3);
}
