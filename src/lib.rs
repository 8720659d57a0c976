//! Draw into an Android [`SurfaceTexture`] either by writing pixels straight
//! into an `ANativeWindow` buffer or by clearing an EGL/OpenGL ES surface.
//!
//! The host activity hands over a texture and an integer mode; the library
//! wraps the texture in an `android.view.Surface`, derives a native window
//! from it and sets up the chosen backend. Every draw request fills the
//! surface with the next color of a fixed palette.
//!
//! # Backends
//!
//! - **Software**: the window's buffers are scaled to a small canvas (one
//!   pixel by default) in RGBA8888 and filled from the CPU.
//! - **Hardware**: an EGL context and window surface are created for the
//!   window and each draw issues a single `glClear` through [glow].
//!
//! A surface object can serve only one of the two; switching backends always
//! releases the old surface before a new one is created.
//!
//! # Structure
//!
//! [`SurfaceManager`] holds all state and talks to the platform through the
//! [`WindowProvider`] and [`GpuBackend`] traits. Diagnostics go through a
//! [`Logger`] to both the `log` facade and a host [`LogSink`]. On Android the
//! `android` module provides the JNI entry points and the real platform
//! implementations.
//!
//! [`SurfaceTexture`]: https://developer.android.com/reference/android/graphics/SurfaceTexture
//! [glow]: https://docs.rs/glow

mod color;
mod config;
mod error;
mod guard;
mod logging;
mod platform;
mod surface;

#[cfg(target_os = "android")]
mod android;

#[cfg(test)]
mod testing;

pub use color::{Argb, Palette, Rgba8, DEFAULT_PALETTE};
pub use config::{CanvasSize, SurfaceConfig, LOG_CAPACITY, LOG_TAG};
pub use error::{InitError, SurfaceError};
pub use guard::{defer, Defer};
pub use logging::{LogSink, Logger, NullSink};
pub use platform::{GpuBackend, PixelBuffer, WindowProvider};
pub use surface::{Draw, Selection, SurfaceManager};
