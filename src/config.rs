//! Tunables for the surface manager.

use crate::color::Palette;

/// Tag used for system log output.
pub const LOG_TAG: &str = "Surfacing";

/// Largest message, in bytes, forwarded by the logging bridge. Longer
/// messages are truncated.
pub const LOG_CAPACITY: usize = 4096;

/// Size, in pixels, of the buffer the software backend draws into.
///
/// The window's buffers are scaled to this size and then stretched by the
/// compositor, so a tiny canvas keeps CPU work negligible for flat fills.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// A single pixel.
    pub const PIXEL: Self = Self {
        width: 1,
        height: 1,
    };
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::PIXEL
    }
}

/// Configuration for a [`SurfaceManager`](crate::SurfaceManager).
#[derive(Clone, Debug, Default)]
pub struct SurfaceConfig {
    /// Buffer geometry for the software backend.
    pub canvas: CanvasSize,
    /// Colors cycled through by successive draws.
    pub palette: Palette,
}
