//! [`GpuBackend`] on EGL, with GL calls issued through [`glow`].

use std::ffi::c_void;

use glow::HasContext;
use khronos_egl as egl;
use ndk::native_window::NativeWindow;

use crate::error::SurfaceError;
use crate::platform::GpuBackend;

/// RGBA8888, renderable with OpenGL ES 2.
const CONFIG_ATTRIBUTES: [egl::Int; 11] = [
    egl::RENDERABLE_TYPE,
    egl::OPENGL_ES2_BIT,
    egl::RED_SIZE,
    8,
    egl::GREEN_SIZE,
    8,
    egl::BLUE_SIZE,
    8,
    egl::ALPHA_SIZE,
    8,
    egl::NONE,
];

const CONTEXT_ATTRIBUTES: [egl::Int; 3] = [egl::CONTEXT_CLIENT_VERSION, 2, egl::NONE];

/// EGL entry points linked against the system `libEGL`.
pub(crate) struct EglBackend {
    egl: egl::Instance<egl::Static>,
}

/// The default display, its chosen configuration and the GL function table
/// loaded through it.
pub(crate) struct EglDisplay {
    display: egl::Display,
    config: egl::Config,
    gl: glow::Context,
}

/// A drawing context and the window surface it renders to.
pub(crate) struct EglTarget {
    context: egl::Context,
    surface: egl::Surface,
}

impl EglBackend {
    pub(crate) fn new() -> Self {
        Self {
            egl: egl::Instance::new(egl::Static),
        }
    }
}

impl GpuBackend<NativeWindow> for EglBackend {
    type Display = EglDisplay;
    type Target = EglTarget;

    fn open_display(&self) -> Result<EglDisplay, SurfaceError> {
        // SAFETY: `DEFAULT_DISPLAY` is always a valid native display id.
        let display = unsafe { self.egl.get_display(egl::DEFAULT_DISPLAY) }
            .ok_or_else(|| SurfaceError::DisplayInit("no default display".into()))?;
        self.egl
            .initialize(display)
            .map_err(|err| SurfaceError::DisplayInit(err.to_string()))?;

        let config = self
            .egl
            .choose_first_config(display, &CONFIG_ATTRIBUTES)
            .map_err(|_| SurfaceError::NoConfig)?
            .ok_or(SurfaceError::NoConfig)?;

        // SAFETY: the loader only resolves symbols; Android's EGL hands out
        // GLES entry points without a current context.
        let gl = unsafe {
            glow::Context::from_loader_function(|name| {
                self.egl
                    .get_proc_address(name)
                    .map_or(std::ptr::null(), |f| f as *const c_void)
            })
        };

        Ok(EglDisplay {
            display,
            config,
            gl,
        })
    }

    fn create_target(
        &self,
        display: &EglDisplay,
        window: &NativeWindow,
    ) -> Result<EglTarget, SurfaceError> {
        let context = self
            .egl
            .create_context(display.display, display.config, None, &CONTEXT_ATTRIBUTES)
            .map_err(|err| SurfaceError::ContextCreation(err.to_string()))?;

        // SAFETY: `window` stays alive while the target exists; the manager
        // destroys the target before releasing the window.
        let surface = unsafe {
            self.egl.create_window_surface(
                display.display,
                display.config,
                window.ptr().as_ptr().cast(),
                None,
            )
        };
        match surface {
            Ok(surface) => Ok(EglTarget { context, surface }),
            Err(err) => {
                let _ = self.egl.destroy_context(display.display, context);
                Err(SurfaceError::WindowSurfaceCreation(err.to_string()))
            }
        }
    }

    fn make_current(&self, display: &EglDisplay, target: &EglTarget) -> Result<(), SurfaceError> {
        self.egl
            .make_current(
                display.display,
                Some(target.surface),
                Some(target.surface),
                Some(target.context),
            )
            .map_err(|err| SurfaceError::MakeCurrent(err.to_string()))
    }

    fn release_current(&self, display: &EglDisplay) {
        // Destroying a context or surface only marks it for deletion while it
        // is still current somewhere.
        if let Err(err) = self.egl.make_current(display.display, None, None, None) {
            log::warn!(target: crate::config::LOG_TAG, "Failed to detach context: {err}");
        }
    }

    fn clear(&self, display: &EglDisplay, [r, g, b, a]: [f32; 4]) {
        let gl = &display.gl;
        // SAFETY: only called between `make_current` and `release_current`.
        unsafe {
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn present(&self, display: &EglDisplay, target: &EglTarget) -> Result<(), SurfaceError> {
        self.egl
            .swap_buffers(display.display, target.surface)
            .map_err(|err| SurfaceError::Present(err.to_string()))
    }

    fn destroy_target(&self, display: &EglDisplay, target: EglTarget) {
        if let Err(err) = self.egl.destroy_surface(display.display, target.surface) {
            log::warn!(target: crate::config::LOG_TAG, "Failed to destroy OpenGL surface: {err}");
        }
        if let Err(err) = self.egl.destroy_context(display.display, target.context) {
            log::warn!(target: crate::config::LOG_TAG, "Failed to destroy OpenGL context: {err}");
        }
    }
}
