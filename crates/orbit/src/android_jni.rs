use jni::{
    JNIEnv,
    objects::{JByteArray, JClass, JObject, JString},
    sys::{jfloat, jlong, jstring},
};
use once_cell::sync::Lazy;
use orbit_session::{InitOptions, MotionSample, NO_SESSION_RAW, SessionRegistry};
use std::sync::{Mutex, MutexGuard, Once, PoisonError};

use crate::android_platform::{AndroidAssets, AndroidContext, AndroidFactory, AndroidSurface};
use crate::raw;

// Static initialization for logging
static INIT: Once = Once::new();

// Every session in the process, keyed by the handle Java stores
static REGISTRY: Lazy<Mutex<SessionRegistry<AndroidFactory>>> =
    Lazy::new(|| Mutex::new(SessionRegistry::new(AndroidFactory::default())));

/// Lock the process registry. A panic while holding the lock leaves the
/// registry consistent (every mutation is a single map operation), so a
/// poisoned lock is recovered rather than propagated.
pub(crate) fn registry() -> MutexGuard<'static, SessionRegistry<AndroidFactory>> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Initialize logging and panic hook for Android
pub(crate) fn init_logging() {
    INIT.call_once(|| {
        let level = if cfg!(feature = "debug-logs") {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(level)
                .with_tag("orbit"),
        );

        std::panic::set_hook(Box::new(|info| {
            let payload = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "Unknown panic".to_string());

            let location = info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "unknown".to_string());

            log::error!("PANIC at {}: {}", location, payload);
        }));
    });
}

pub(crate) fn read_string(env: &mut JNIEnv, value: &JString) -> anyhow::Result<String> {
    if value.is_null() {
        return Ok(String::new());
    }
    Ok(env.get_string(value)?.into())
}

/// Install the process-wide NDK context
///
/// Called once from the first `surfaceCreated`; later calls are no-ops.
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_init_1ndk_1context(
    env: JNIEnv,
    _class: JClass,
    context: JObject,
) {
    init_logging();
    log::info!("init_ndk_context called");

    let context = match AndroidContext::new(&env, &context) {
        Ok(context) => context,
        Err(e) => {
            log::error!("init_ndk_context: {:#}", e);
            return;
        }
    };
    raw::init_context(&mut *registry(), context);
}

/// Create a scene session on `surface`
///
/// # Arguments
/// * `asset_manager` - The app's `AssetManager`
/// * `surface` - The Android Surface object (will be converted to ANativeWindow)
/// * `scale_factor` - Display density
/// * `opts` - Init options as JSON, empty for defaults
///
/// # Returns
/// Session handle as jlong, or 0 on failure
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_create_1bevy_1app(
    mut env: JNIEnv,
    _class: JClass,
    asset_manager: JObject,
    surface: JObject,
    scale_factor: jfloat,
    opts: JString,
) -> jlong {
    init_logging();

    let options = read_string(&mut env, &opts).and_then(|json| raw::parse_options(&json));
    create(&env, &asset_manager, &surface, scale_factor, options)
}

/// Create a session from individual colour components
///
/// Earlier bridge revision; the scene starts empty and drag sensitivity keeps
/// its default.
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_create_1bevy_1app_1legacy(
    env: JNIEnv,
    _class: JClass,
    asset_manager: JObject,
    surface: JObject,
    scale_factor: jfloat,
    bg_r: jfloat,
    bg_g: jfloat,
    bg_b: jfloat,
    light_r: jfloat,
    light_g: jfloat,
    light_b: jfloat,
    light_strength: jfloat,
) -> jlong {
    init_logging();

    let options = InitOptions::from_legacy(
        [bg_r, bg_g, bg_b],
        [light_r, light_g, light_b],
        light_strength,
    );
    create(&env, &asset_manager, &surface, scale_factor, Ok(options))
}

fn create(
    env: &JNIEnv,
    asset_manager: &JObject,
    surface: &JObject,
    scale_factor: f32,
    options: anyhow::Result<InitOptions>,
) -> jlong {
    let assets = match AndroidAssets::from_java(env, asset_manager) {
        Ok(assets) => assets,
        Err(e) => {
            log::error!("create_bevy_app: {:#}", e);
            return NO_SESSION_RAW;
        }
    };
    let surface = match AndroidSurface::from_java(env, surface) {
        Ok(surface) => surface,
        Err(e) => {
            log::error!("create_bevy_app: {:#}", e);
            return NO_SESSION_RAW;
        }
    };
    raw::create(&mut *registry(), assets, surface, scale_factor, options)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_enter_1frame(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    raw::enter_frame(&mut *registry(), handle);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_device_1motion(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    x: jfloat,
    y: jfloat,
    z: jfloat,
) {
    raw::device_motion(&mut *registry(), handle, MotionSample::new(x, y, z));
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_device_1enter_1touch(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    x: jfloat,
    y: jfloat,
) {
    raw::touch_enter(&mut *registry(), handle, x, y);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_device_1touch_1move(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    x: jfloat,
    y: jfloat,
) {
    raw::touch_move(&mut *registry(), handle, x, y);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_device_1exit_1touch(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    raw::touch_exit(&mut *registry(), handle);
}

/// Move the camera to `(x, y, z)` relative to the orbit target
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_update_1camera_1offset(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    x: jfloat,
    y: jfloat,
    z: jfloat,
) {
    raw::update_camera_offset(&mut *registry(), handle, [x, y, z]);
}

/// Import mesh file bytes into the session's scene
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_import_1mesh(
    env: JNIEnv,
    _class: JClass,
    handle: jlong,
    data: JByteArray,
) {
    let bytes = match env.convert_byte_array(&data) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("import_mesh: failed to read byte array: {:?}", e);
            return;
        }
    };
    raw::import_mesh(&mut *registry(), handle, &bytes);
}

/// Current scene object as JSON, empty when there is none
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_get_1mesh(
    env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jstring {
    let json = raw::current_object_json(&*registry(), handle);
    match env.new_string(json) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            log::error!("get_mesh: failed to create Java string: {:?}", e);
            std::ptr::null_mut()
        }
    }
}

/// Tear down a session
///
/// Called from `surfaceDestroyed`. Releasing an already released handle does
/// nothing.
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_RustBridge_release_1bevy_1app(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    log::info!("release_bevy_app called");
    raw::release(&mut *registry(), handle);
}
