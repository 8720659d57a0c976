//! JNI side of the platform: `android.view.Surface` objects, the native
//! windows behind them, and the activity's log callback.

use std::sync::Arc;

use jni::objects::{GlobalRef, JClass, JMethodID, JObject, JValue};
use jni::signature::{Primitive, ReturnType};
use jni::{JNIEnv, JavaVM};
use ndk::hardware_buffer_format::HardwareBufferFormat;
use ndk::native_window::NativeWindow;

use crate::config::CanvasSize;
use crate::error::{InitError, SurfaceError};
use crate::logging::LogSink;
use crate::platform::{PixelBuffer, WindowProvider};

const SURFACE_CLASS: &str = "android/view/Surface";
const SURFACE_INIT: (&str, &str) = ("<init>", "(Landroid/graphics/SurfaceTexture;)V");
const SURFACE_RELEASE: (&str, &str) = ("release", "()V");

const ACTIVITY_CLASS: &str = "online/adamek/sten/surfacing/MainActivity";
const ACTIVITY_LOG: (&str, &str) = ("log", "(Ljava/lang/String;)V");

/// Print and clear any exception a JNI call left pending, so the next call
/// starts clean.
pub(crate) fn clear_exception(env: &mut JNIEnv<'_>) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}

fn find_class<'local>(
    env: &mut JNIEnv<'local>,
    name: &'static str,
) -> Result<JClass<'local>, InitError> {
    env.find_class(name).map_err(|_| {
        clear_exception(env);
        InitError::ClassNotFound(name)
    })
}

fn method_id(
    env: &mut JNIEnv<'_>,
    class: &JClass<'_>,
    class_name: &'static str,
    (name, signature): (&'static str, &'static str),
) -> Result<JMethodID, InitError> {
    env.get_method_id(class, name, signature).map_err(|_| {
        clear_exception(env);
        InitError::MethodNotFound {
            class: class_name,
            name,
            signature,
        }
    })
}

/// Resolve `MainActivity.log(String)`.
pub(crate) fn resolve_log_method(env: &mut JNIEnv<'_>) -> Result<JMethodID, InitError> {
    let activity = find_class(env, ACTIVITY_CLASS)?;
    method_id(env, &activity, ACTIVITY_CLASS, ACTIVITY_LOG)
}

/// [`WindowProvider`] backed by `android.view.Surface` and `ANativeWindow`.
pub(crate) struct JniWindows {
    vm: Arc<JavaVM>,
    surface_class: GlobalRef,
    surface_init: JMethodID,
    surface_release: JMethodID,
}

impl JniWindows {
    /// Resolve the `Surface` class, its constructor and `release()`.
    pub(crate) fn load(vm: Arc<JavaVM>, env: &mut JNIEnv<'_>) -> Result<Self, InitError> {
        let class = find_class(env, SURFACE_CLASS)?;
        let surface_init = method_id(env, &class, SURFACE_CLASS, SURFACE_INIT)?;
        let surface_release = method_id(env, &class, SURFACE_CLASS, SURFACE_RELEASE)?;
        let surface_class = env
            .new_global_ref(&class)
            .map_err(|err| InitError::Environment(err.to_string()))?;
        Ok(Self {
            vm,
            surface_class,
            surface_init,
            surface_release,
        })
    }
}

impl WindowProvider for JniWindows {
    type Texture = GlobalRef;
    type Surface = GlobalRef;
    type Window = NativeWindow;

    fn create_surface(&self, texture: &GlobalRef) -> Result<GlobalRef, SurfaceError> {
        let mut env = self
            .vm
            .get_env()
            .map_err(|err| SurfaceError::SurfaceConstruction(err.to_string()))?;
        let class = <&JClass<'_>>::from(self.surface_class.as_obj());

        // SAFETY: `surface_init` was resolved on this class with a single
        // `SurfaceTexture` parameter.
        let local = unsafe {
            env.new_object_unchecked(
                class,
                self.surface_init,
                &[JValue::Object(texture.as_obj()).as_jni()],
            )
        };
        let local = match local {
            Ok(local) if !local.is_null() => local,
            Ok(_) => return Err(SurfaceError::SurfaceConstruction("null surface".into())),
            Err(err) => {
                clear_exception(&mut env);
                return Err(SurfaceError::SurfaceConstruction(err.to_string()));
            }
        };

        let global = env
            .new_global_ref(&local)
            .map_err(|err| SurfaceError::SurfaceConstruction(err.to_string()));
        let _ = env.delete_local_ref(local);
        global
    }

    fn release_surface(&self, surface: GlobalRef) {
        let Ok(mut env) = self.vm.get_env() else {
            return;
        };
        // SAFETY: `surface_release` is `Surface.release()V`.
        let released = unsafe {
            env.call_method_unchecked(
                &surface,
                self.surface_release,
                ReturnType::Primitive(Primitive::Void),
                &[],
            )
        };
        if let Err(err) = released {
            clear_exception(&mut env);
            log::warn!(target: crate::config::LOG_TAG, "Failed to release surface: {err}");
        }
    }

    fn acquire_window(&self, surface: &GlobalRef) -> Result<NativeWindow, SurfaceError> {
        let env = self
            .vm
            .get_env()
            .map_err(|_| SurfaceError::WindowUnavailable)?;
        // SAFETY: `env` belongs to the calling thread and `surface` is a live
        // `android.view.Surface` reference.
        unsafe { NativeWindow::from_surface(env.get_raw(), surface.as_obj().as_raw()) }
            .ok_or(SurfaceError::WindowUnavailable)
    }

    fn release_window(&self, window: NativeWindow) {
        drop(window);
    }

    fn set_buffers_geometry(
        &self,
        window: &NativeWindow,
        size: CanvasSize,
    ) -> Result<(), SurfaceError> {
        let width = i32::try_from(size.width).map_err(|_| SurfaceError::BufferGeometry(-1))?;
        let height = i32::try_from(size.height).map_err(|_| SurfaceError::BufferGeometry(-1))?;
        window
            .set_buffers_geometry(width, height, Some(HardwareBufferFormat::R8G8B8A8_UNORM))
            .map_err(|err| SurfaceError::BufferGeometry(err.raw_os_error().map_or(-1, |e| -e)))
    }

    fn paint(
        &self,
        window: &NativeWindow,
        bounds: CanvasSize,
        paint: &mut dyn FnMut(PixelBuffer<'_>),
    ) -> Result<(), SurfaceError> {
        let mut dirty = ndk_sys::ARect {
            left: 0,
            top: 0,
            right: i32::try_from(bounds.width).unwrap_or(i32::MAX),
            bottom: i32::try_from(bounds.height).unwrap_or(i32::MAX),
        };
        // SAFETY: all-zero is a valid `ANativeWindow_Buffer`; lock fills it in.
        let mut buffer: ndk_sys::ANativeWindow_Buffer = unsafe { std::mem::zeroed() };

        // SAFETY: `window` owns a reference to a live `ANativeWindow`.
        let status =
            unsafe { ndk_sys::ANativeWindow_lock(window.ptr().as_ptr(), &mut buffer, &mut dirty) };
        if status != 0 {
            return Err(SurfaceError::Lock(format!("status {status}")));
        }

        // The locked area may be larger than requested; fill all of it.
        let width = usize::try_from(buffer.width).unwrap_or(0);
        let height = usize::try_from(buffer.height).unwrap_or(0);
        let stride = usize::try_from(buffer.stride).unwrap_or(0);
        let len = PixelBuffer::byte_len(height, stride).filter(|_| !buffer.bits.is_null());

        let painted = len.and_then(|len| {
            // SAFETY: `bits` is non-null and a locked RGBA8888 buffer holds
            // `stride * height` pixels of four bytes each, mapped until
            // `unlockAndPost`.
            let bytes = unsafe { std::slice::from_raw_parts_mut(buffer.bits.cast::<u8>(), len) };
            PixelBuffer::new(bytes, width, height, stride).map(paint)
        });

        // SAFETY: the window is locked by the call above.
        let status = unsafe { ndk_sys::ANativeWindow_unlockAndPost(window.ptr().as_ptr()) };
        if painted.is_none() {
            return Err(SurfaceError::Lock(format!(
                "unexpected buffer {width}x{height}, stride {stride}"
            )));
        }
        if status != 0 {
            return Err(SurfaceError::Post(format!("status {status}")));
        }
        Ok(())
    }
}

/// Forwards log lines to `MainActivity.log(String)` on the calling activity.
pub(crate) struct ActivityLog<'a> {
    pub(crate) vm: &'a JavaVM,
    pub(crate) activity: &'a JObject<'a>,
    pub(crate) method: JMethodID,
}

impl LogSink for ActivityLog<'_> {
    fn write(&self, message: &str) {
        let Ok(mut env) = self.vm.get_env() else {
            return;
        };
        let Ok(text) = env.new_string(message) else {
            clear_exception(&mut env);
            return;
        };
        // SAFETY: `method` is `MainActivity.log(Ljava/lang/String;)V`.
        let called = unsafe {
            env.call_method_unchecked(
                self.activity,
                self.method,
                ReturnType::Primitive(Primitive::Void),
                &[JValue::Object(&text).as_jni()],
            )
        };
        if called.is_err() {
            clear_exception(&mut env);
        }
        let _ = env.delete_local_ref(text);
    }
}
