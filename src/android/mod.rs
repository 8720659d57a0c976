//! JNI entry points for `online.adamek.sten.surfacing.MainActivity`.
//!
//! `JNI_OnLoad` resolves every host class and method up front and stores a
//! single [`SurfaceManager`] behind a mutex. If anything fails to resolve the
//! library refuses to load and the exported callbacks stay no-ops.

mod egl;
mod jni_host;

use std::ffi::c_void;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use jni::objects::{JMethodID, JObject};
use jni::sys::{jint, JNI_ERR, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM};

use crate::config::{SurfaceConfig, LOG_TAG};
use crate::error::InitError;
use crate::logging::Logger;
use crate::report;
use crate::surface::{Selection, SurfaceManager};

use self::egl::EglBackend;
use self::jni_host::{ActivityLog, JniWindows};

/// Everything resolved at load time plus the one manager instance.
struct Bridge {
    vm: Arc<JavaVM>,
    log_method: JMethodID,
    manager: SurfaceManager<JniWindows, EglBackend>,
}

// SAFETY: the EGL and GL handles inside the manager are plain pointers that
// are only touched while the mutex is held, and no context stays current
// between calls.
unsafe impl Send for Bridge {}

static BRIDGE: OnceLock<Mutex<Bridge>> = OnceLock::new();

impl Bridge {
    fn load(vm: JavaVM) -> Result<Self, InitError> {
        let vm = Arc::new(vm);
        let mut env = vm
            .get_env()
            .map_err(|err| InitError::Environment(err.to_string()))?;

        let log_method = jni_host::resolve_log_method(&mut env)?;
        let windows = JniWindows::load(Arc::clone(&vm), &mut env)?;
        drop(env);

        Ok(Self {
            vm,
            log_method,
            manager: SurfaceManager::new(windows, EglBackend::new(), SurfaceConfig::default()),
        })
    }
}

fn bridge() -> Option<MutexGuard<'static, Bridge>> {
    BRIDGE
        .get()
        .map(|bridge| bridge.lock().unwrap_or_else(PoisonError::into_inner))
}

/// Library load hook: install the system logger and resolve host handles.
#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(vm: JavaVM, _: *mut c_void) -> jint {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag(LOG_TAG),
    );

    let loaded = Bridge::load(vm).and_then(|bridge| {
        BRIDGE
            .set(Mutex::new(bridge))
            .map_err(|_| InitError::AlreadyInitialized)
    });
    match loaded {
        Ok(()) => JNI_VERSION_1_6,
        Err(err) => {
            log::error!(target: LOG_TAG, "Initialization failed: {err}");
            JNI_ERR
        }
    }
}

/// `MainActivity.onSelected(SurfaceTexture, int)`.
#[no_mangle]
pub extern "system" fn Java_online_adamek_sten_surfacing_MainActivity_onSelected<'local>(
    mut env: JNIEnv<'local>,
    activity: JObject<'local>,
    texture: JObject<'local>,
    selection: jint,
) {
    let Some(mut bridge) = bridge() else {
        return;
    };
    let Bridge {
        vm,
        log_method,
        manager,
    } = &mut *bridge;
    let sink = ActivityLog {
        vm: &**vm,
        activity: &activity,
        method: *log_method,
    };
    let log = Logger::new(&sink);

    let Some(selection) = Selection::from_mode(selection) else {
        report!(log, "Unknown selection {selection}");
        return;
    };

    let texture = if texture.is_null() {
        None
    } else {
        match env.new_global_ref(&texture) {
            Ok(texture) => Some(texture),
            Err(err) => {
                jni_host::clear_exception(&mut env);
                report!(log, "Failed to reference surface texture: {err}");
                return;
            }
        }
    };

    // Failures are reported through `log`; the host has no return channel.
    let _ = manager.select(log, texture.as_ref(), selection);
}

/// `MainActivity.onDraw()`.
#[no_mangle]
pub extern "system" fn Java_online_adamek_sten_surfacing_MainActivity_onDraw<'local>(
    _env: JNIEnv<'local>,
    activity: JObject<'local>,
) {
    let Some(mut bridge) = bridge() else {
        return;
    };
    let Bridge {
        vm,
        log_method,
        manager,
    } = &mut *bridge;
    let sink = ActivityLog {
        vm: &**vm,
        activity: &activity,
        method: *log_method,
    };

    let _ = manager.draw(Logger::new(&sink));
}
