//! Core error types

use thiserror::Error;

/// Core compositor errors
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Wayland protocol error: {0}")]
    WaylandError(String),

    #[error("State error: {0}")]
    StateError(String),

    #[error("Invalid surface ID: {0}")]
    InvalidSurfaceId(u32),

    #[error("Invalid buffer ID: {0}")]
    InvalidBufferId(u32),

    #[error("Invalid buffer size: {0}x{1}")]
    InvalidBufferSize(i32, i32),

    #[error("Unsupported visual: {0}")]
    UnsupportedVisual(u32),

    #[error("Failed to map shared memory: {0}")]
    MapFailed(String),

    #[error("Failed to import DRM buffer name {0}")]
    ImportFailed(u32),

    #[error("Failed to create texture")]
    TextureFailed,
}

impl CoreError {
    pub fn wayland_error(msg: impl Into<String>) -> Self {
        Self::WaylandError(msg.into())
    }

    pub fn state_error(msg: impl Into<String>) -> Self {
        Self::StateError(msg.into())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
