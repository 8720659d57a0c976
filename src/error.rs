//! Error types for surface selection, drawing and library initialization.

use thiserror::Error;

/// A transient failure while switching backends or drawing a frame.
///
/// These never poison the manager: the failed transition is abandoned, the
/// manager falls back to idle, and the caller may select again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// A backend was requested but the host supplied no texture.
    #[error("No surface texture to draw to")]
    MissingTexture,

    /// The host refused to wrap the texture in a surface object.
    #[error("Failed to construct surface: {0}")]
    SurfaceConstruction(String),

    /// No native window could be derived from the surface.
    #[error("Failed to obtain window")]
    WindowUnavailable,

    /// `ANativeWindow_setBuffersGeometry` returned a non-zero status.
    #[error("Failed to set buffers geometry ({0})")]
    BufferGeometry(i32),

    /// The window's backing buffer could not be locked for CPU writes.
    #[error("Failed to lock ({0})")]
    Lock(String),

    /// The locked buffer could not be unlocked and queued for display.
    #[error("Failed to post ({0})")]
    Post(String),

    /// The default EGL display could not be obtained or initialized.
    #[error("Failed to initialize OpenGL display: {0}")]
    DisplayInit(String),

    /// No EGL configuration matched the RGBA8888 / GLES2 request.
    #[error("No OpenGL display config chosen")]
    NoConfig,

    /// `eglCreateContext` failed.
    #[error("Failed to create OpenGL context: {0}")]
    ContextCreation(String),

    /// `eglCreateWindowSurface` failed.
    #[error("Failed to create OpenGL surface: {0}")]
    WindowSurfaceCreation(String),

    /// The drawing context could not be bound to the calling thread.
    #[error("Failed to attach context: {0}")]
    MakeCurrent(String),

    /// `eglSwapBuffers` failed.
    #[error("Failed to present frame: {0}")]
    Present(String),
}

/// A failure while loading the library. Any of these leaves the library
/// unusable for the lifetime of the process.
#[derive(Error, Debug)]
pub enum InitError {
    /// A host class could not be found.
    #[error("Class not found: {0}")]
    ClassNotFound(&'static str),

    /// A host method could not be resolved.
    #[error("Method not found: {class}.{name}{signature}")]
    MethodNotFound {
        /// JNI class name.
        class: &'static str,
        /// Method name.
        name: &'static str,
        /// JNI method signature.
        signature: &'static str,
    },

    /// The VM did not hand out an environment for the loading thread.
    #[error("No JNI environment: {0}")]
    Environment(String),

    /// The library was already initialized once.
    #[error("Already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_log_lines() {
        assert_eq!(SurfaceError::WindowUnavailable.to_string(), "Failed to obtain window");
        assert_eq!(
            SurfaceError::BufferGeometry(-22).to_string(),
            "Failed to set buffers geometry (-22)"
        );
        assert_eq!(SurfaceError::NoConfig.to_string(), "No OpenGL display config chosen");
    }

    #[test]
    fn method_not_found_names_the_signature() {
        let err = InitError::MethodNotFound {
            class: "android/view/Surface",
            name: "release",
            signature: "()V",
        };
        assert_eq!(err.to_string(), "Method not found: android/view/Surface.release()V");
    }
}
