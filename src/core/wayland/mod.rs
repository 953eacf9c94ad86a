//! Protocol plumbing: generated interface tables and per-global
//! `Dispatch`/`GlobalDispatch` implementations on `CompositorState`.
//!
//! Resource user data is an internal id (`u32` surface/buffer ids,
//! `DeviceId` for input devices) looked up in the state's tables; the
//! protocol objects themselves stay thin handles.

pub mod protocol;

pub mod buffer;
pub mod compositor;
pub mod drm;
pub mod output;
pub mod seat;
pub mod shell;
pub mod shm;
