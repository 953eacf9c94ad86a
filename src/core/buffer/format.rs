//! Visual token resolution.
//!
//! Clients name pixel layouts with an opaque wire token. The token
//! resolves to a concrete channel ordering exactly once, at buffer
//! creation, and the ordering depends on the target byte order: on
//! little-endian machines 32-bit ARGB words are BGRA in memory.

/// Protocol-level pixel layout token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visual {
    PremultipliedArgb,
    Argb,
    Rgb,
}

impl Visual {
    /// Resolve a wire token. Unknown tokens yield None; the buffer must
    /// not be created in that case.
    pub fn from_wire(token: u32) -> Option<Self> {
        match token {
            0 => Some(Visual::PremultipliedArgb),
            1 => Some(Visual::Argb),
            2 => Some(Visual::Rgb),
            _ => None,
        }
    }

    /// The concrete in-memory pixel format for this visual on the
    /// current target.
    pub fn pixel_format(self) -> PixelFormat {
        #[cfg(target_endian = "little")]
        match self {
            Visual::PremultipliedArgb => PixelFormat::Bgra8888Pre,
            Visual::Argb => PixelFormat::Bgra8888,
            Visual::Rgb => PixelFormat::Bgr888,
        }
        #[cfg(target_endian = "big")]
        match self {
            Visual::PremultipliedArgb => PixelFormat::Argb8888Pre,
            Visual::Argb => PixelFormat::Argb8888,
            Visual::Rgb => PixelFormat::Rgb888,
        }
    }
}

/// Concrete channel ordering handed to the graphics host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Bgra8888Pre,
    Bgra8888,
    Bgr888,
    Argb8888Pre,
    Argb8888,
    Rgb888,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Bgra8888Pre
            | PixelFormat::Bgra8888
            | PixelFormat::Argb8888Pre
            | PixelFormat::Argb8888 => 4,
            PixelFormat::Bgr888 | PixelFormat::Rgb888 => 3,
        }
    }
}
