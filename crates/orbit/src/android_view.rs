// JNI surface for `BevySurfaceView`, where the view delegates its whole
// callback set to one native controller.
//
// `nativeCreate` boxes a `ViewHost` and hands its address to the view, which
// passes it back on every callback. The controller owns the session handle;
// the view never sees it. Sensor samples arrive on the sensor thread and only
// touch the motion sink.

use anyhow::Result;
use jni::{
    JNIEnv, JavaVM,
    objects::{GlobalRef, JClass, JObject, JString},
    sys::{jfloat, jint, jlong},
};
use orbit_session::{
    InitOptions, MotionSample, MotionSink, NO_SESSION_RAW, NativeBridge, Redraw, SceneObject,
    SessionHandle, SurfaceHost, TouchEvent,
};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::android_jni::{init_logging, read_string, registry};
use crate::android_platform::{AndroidAssets, AndroidContext, AndroidSurface};
use crate::raw;

/// Bridge onto the process registry shared with the `RustBridge` exports.
pub struct GlobalBridge;

impl NativeBridge for GlobalBridge {
    type Context = AndroidContext;
    type Assets = AndroidAssets;
    type Surface = AndroidSurface;

    fn init_context(&mut self, context: AndroidContext) -> Result<()> {
        registry().init_context(context)
    }

    fn create_session(
        &mut self,
        assets: AndroidAssets,
        surface: AndroidSurface,
        scale_factor: f32,
        options: &InitOptions,
    ) -> Result<SessionHandle> {
        registry().create_session(assets, surface, scale_factor, options)
    }

    fn enter_frame(&mut self, handle: SessionHandle) {
        registry().enter_frame(handle);
    }

    fn device_motion(&mut self, handle: SessionHandle, sample: MotionSample) {
        registry().device_motion(handle, sample);
    }

    fn touch_enter(&mut self, handle: SessionHandle, x: f32, y: f32) {
        registry().touch_enter(handle, x, y);
    }

    fn touch_move(&mut self, handle: SessionHandle, x: f32, y: f32) {
        registry().touch_move(handle, x, y);
    }

    fn touch_exit(&mut self, handle: SessionHandle) {
        registry().touch_exit(handle);
    }

    fn update_camera_offset(&mut self, handle: SessionHandle, offset: [f32; 3]) {
        registry().update_camera_offset(handle, offset);
    }

    fn import_mesh(&mut self, handle: SessionHandle, data: &[u8]) -> Result<()> {
        registry().import_mesh(handle, data)
    }

    fn current_object(&self, handle: SessionHandle) -> Option<SceneObject> {
        registry().current_object(handle)
    }

    fn release_session(&mut self, handle: SessionHandle) {
        registry().release_session(handle);
    }

    fn is_live(&self, handle: SessionHandle) -> bool {
        registry().is_live(handle)
    }
}

/// Calls `View.invalidate()` so the view draws again on its next refresh.
pub struct ViewInvalidator {
    vm: JavaVM,
    view: GlobalRef,
}

impl Redraw for ViewInvalidator {
    fn request_redraw(&self) {
        let mut env = match self.vm.attach_current_thread() {
            Ok(env) => env,
            Err(e) => {
                log::error!("invalidate: failed to attach thread: {:?}", e);
                return;
            }
        };
        if let Err(e) = env.call_method(&self.view, "invalidate", "()V", &[]) {
            log::error!("invalidate failed: {:?}", e);
        }
    }
}

/// Native half of one `BevySurfaceView`.
struct ViewHost {
    host: Mutex<SurfaceHost<GlobalBridge, ViewInvalidator>>,
    motion: Mutex<MotionSink>,
}

impl ViewHost {
    fn host(&self) -> MutexGuard<'_, SurfaceHost<GlobalBridge, ViewInvalidator>> {
        self.host.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Borrow the controller behind a handle from `nativeCreate`.
///
/// # Safety
/// `handle` must be 0 or a value returned by `nativeCreate` that has not yet
/// been passed to `nativeDestroy`.
unsafe fn view_host<'a>(handle: jlong) -> Option<&'a ViewHost> {
    if handle == 0 {
        return None;
    }
    Some(unsafe { &*(handle as *const ViewHost) })
}

/// Create the controller for a view
///
/// Called from the view's constructor.
///
/// # Returns
/// Controller handle as jlong or 0 on failure
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_BevySurfaceView_nativeCreate(
    env: JNIEnv,
    _class: JClass,
    view: JObject,
) -> jlong {
    init_logging();
    log::info!("nativeCreate called");

    let vm = match env.get_java_vm() {
        Ok(vm) => vm,
        Err(e) => {
            log::error!("Failed to get JavaVM: {:?}", e);
            return 0;
        }
    };
    let view = match env.new_global_ref(view) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Failed to create global ref to view: {:?}", e);
            return 0;
        }
    };

    let (host, sink) = SurfaceHost::new(GlobalBridge, ViewInvalidator { vm, view });
    let view_host = Box::new(ViewHost {
        host: Mutex::new(host),
        motion: Mutex::new(sink),
    });
    Box::into_raw(view_host) as jlong
}

/// Surface created callback
///
/// Installs the NDK context on first use and starts a session unless one is
/// active. Returns the session handle, or 0 when none could be created.
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_BevySurfaceView_nativeSurfaceCreated(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    context: JObject,
    asset_manager: JObject,
    surface: JObject,
    scale_factor: jfloat,
    opts: JString,
) -> jlong {
    let Some(view_host) = (unsafe { view_host(handle) }) else {
        log::error!("nativeSurfaceCreated called with null handle");
        return NO_SESSION_RAW;
    };

    let started = (|| -> Result<SessionHandle> {
        let context = AndroidContext::new(&env, &context)?;
        let assets = AndroidAssets::from_java(&env, &asset_manager)?;
        let surface = AndroidSurface::from_java(&env, &surface)?;
        let options = raw::parse_options(&read_string(&mut env, &opts)?)?;
        view_host
            .host()
            .surface_created(context, assets, surface, scale_factor, &options)
    })();

    match started {
        Ok(session) => session.into_raw(),
        Err(e) => {
            log::error!("nativeSurfaceCreated: {:#}", e);
            NO_SESSION_RAW
        }
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_BevySurfaceView_nativeSurfaceChanged(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    width: jint,
    height: jint,
) {
    if let Some(view_host) = unsafe { view_host(handle) } {
        view_host
            .host()
            .surface_changed(width.max(0) as u32, height.max(0) as u32);
    }
}

/// Surface destroyed callback
///
/// Releases the session before the surface goes away.
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_BevySurfaceView_nativeSurfaceDestroyed(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    log::info!("nativeSurfaceDestroyed called");
    if let Some(view_host) = unsafe { view_host(handle) } {
        view_host.host().surface_destroyed();
    }
}

/// Draw callback from `onDraw`
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_BevySurfaceView_nativeDraw(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if let Some(view_host) = unsafe { view_host(handle) } {
        view_host.host().on_draw();
    }
}

/// Touch event callback
///
/// # Arguments
/// * `action` - The touch action (DOWN=0, UP=1, MOVE=2, CANCEL=3)
/// * `x` - The X coordinate
/// * `y` - The Y coordinate
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_BevySurfaceView_nativeTouch(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    action: jint,
    x: jfloat,
    y: jfloat,
) -> jni::sys::jboolean {
    let Some(view_host) = (unsafe { view_host(handle) }) else {
        return 0;
    };
    let Some(event) = TouchEvent::from_android_action(action, x, y) else {
        return 0;
    };
    view_host.host().on_touch(event) as jni::sys::jboolean
}

/// Gravity sensor callback, on the sensor thread
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_BevySurfaceView_nativeSensor(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    x: jfloat,
    y: jfloat,
    z: jfloat,
) {
    if let Some(view_host) = unsafe { view_host(handle) } {
        view_host
            .motion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .publish(MotionSample::new(x, y, z));
    }
}

/// Camera offset from the settings screen
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_BevySurfaceView_nativeCameraOffset(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    x: jfloat,
    y: jfloat,
    z: jfloat,
) {
    if let Some(view_host) = unsafe { view_host(handle) } {
        view_host.host().update_camera_offset([x, y, z]);
    }
}

/// Destroy the controller
///
/// Called once the view is detached and its sensor listener unregistered.
/// Releases a session that is still active.
#[unsafe(no_mangle)]
pub extern "system" fn Java_name_renderer_bevy_BevySurfaceView_nativeDestroy(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    log::info!("nativeDestroy called");

    if handle == 0 {
        log::warn!("nativeDestroy called with null handle");
        return;
    }

    // Reconstruct and drop the Box
    unsafe {
        drop(Box::from_raw(handle as *mut ViewHost));
    }
}
