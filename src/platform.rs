//! Capabilities the [`SurfaceManager`](crate::SurfaceManager) needs from the
//! platform.
//!
//! [`WindowProvider`] wraps host textures in surface objects, derives native
//! windows from them and hands out locked CPU buffers. [`GpuBackend`] owns
//! the display connection, creates per-window drawing targets and issues the
//! clear/present calls. The Android implementations live in `android`; tests
//! use a recording fake.

use crate::color::Rgba8;
use crate::config::CanvasSize;
use crate::error::SurfaceError;

/// Surface objects, native windows and CPU access to their buffers.
pub trait WindowProvider {
    /// Host texture the surface is created for.
    type Texture;
    /// Platform surface object wrapping a texture.
    type Surface;
    /// Native window derived from a surface.
    type Window;

    /// Construct a surface object for `texture`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::SurfaceConstruction`] if the host refuses.
    fn create_surface(&self, texture: &Self::Texture) -> Result<Self::Surface, SurfaceError>;

    /// Release a surface object. Must happen before another surface is
    /// created for the same texture.
    fn release_surface(&self, surface: Self::Surface);

    /// Derive the native window behind `surface`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::WindowUnavailable`] if the surface has no window.
    fn acquire_window(&self, surface: &Self::Surface) -> Result<Self::Window, SurfaceError>;

    /// Release a native window.
    fn release_window(&self, window: Self::Window);

    /// Scale the window's buffers to `size`, RGBA8888.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::BufferGeometry`] with the platform status code.
    fn set_buffers_geometry(&self, window: &Self::Window, size: CanvasSize)
        -> Result<(), SurfaceError>;

    /// Lock the window's next buffer over `bounds`, let `paint` write into
    /// it, then unlock and queue it for display.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Lock`] or [`SurfaceError::Post`].
    fn paint(
        &self,
        window: &Self::Window,
        bounds: CanvasSize,
        paint: &mut dyn FnMut(PixelBuffer<'_>),
    ) -> Result<(), SurfaceError>;
}

/// EGL-style GPU rendering onto native windows.
///
/// `Window` is the native window type of the paired [`WindowProvider`].
pub trait GpuBackend<Window> {
    /// Display connection plus chosen configuration. Opened once and kept for
    /// the lifetime of the manager.
    type Display;
    /// Drawing context plus on-screen surface for one window.
    type Target;

    /// Connect to the default display and choose an RGBA8888, GLES2
    /// configuration.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::DisplayInit`] or [`SurfaceError::NoConfig`].
    fn open_display(&self) -> Result<Self::Display, SurfaceError>;

    /// Create a fresh context and window surface bound to `window`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::ContextCreation`] or
    /// [`SurfaceError::WindowSurfaceCreation`].
    fn create_target(
        &self,
        display: &Self::Display,
        window: &Window,
    ) -> Result<Self::Target, SurfaceError>;

    /// Bind `target` as current on the calling thread.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::MakeCurrent`].
    fn make_current(&self, display: &Self::Display, target: &Self::Target)
        -> Result<(), SurfaceError>;

    /// Unbind whatever is current on the calling thread.
    fn release_current(&self, display: &Self::Display);

    /// Clear the current target's color buffer to `rgba`.
    fn clear(&self, display: &Self::Display, rgba: [f32; 4]);

    /// Swap the target's buffers.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Present`].
    fn present(&self, display: &Self::Display, target: &Self::Target) -> Result<(), SurfaceError>;

    /// Destroy the target's surface and context.
    fn destroy_target(&self, display: &Self::Display, target: Self::Target);
}

/// A locked window buffer in `R8G8B8A8_UNORM` layout.
///
/// `stride` is in pixels and may exceed `width`; the locked area may be
/// larger than requested.
#[derive(Debug)]
pub struct PixelBuffer<'a> {
    pixels: &'a mut [Rgba8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap raw buffer bytes. Returns `None` if `bytes` cannot hold
    /// `height` rows of `stride` pixels or `width > stride`.
    pub fn new(bytes: &'a mut [u8], width: usize, height: usize, stride: usize) -> Option<Self> {
        if width > stride {
            return None;
        }
        let bytes = bytes.get_mut(..Self::byte_len(height, stride)?)?;
        Some(Self {
            pixels: bytemuck::cast_slice_mut(bytes),
            width,
            height,
            stride,
        })
    }

    /// Bytes spanned by `height` rows of `stride` pixels, or `None` on
    /// overflow.
    #[must_use]
    pub fn byte_len(height: usize, stride: usize) -> Option<usize> {
        stride.checked_mul(height)?.checked_mul(4)
    }

    /// Width of the visible area in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the visible area in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Fill every visible pixel with `pixel`, leaving row padding alone.
    pub fn fill(&mut self, pixel: Rgba8) {
        if self.stride == 0 {
            return;
        }
        for row in self.pixels.chunks_exact_mut(self.stride).take(self.height) {
            row[..self.width].fill(pixel);
        }
    }
}
