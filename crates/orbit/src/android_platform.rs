use anyhow::{Context as _, Result, anyhow, bail};
use jni::{
    JNIEnv, JavaVM,
    objects::{GlobalRef, JObject},
};
use ndk::asset::AssetManager;
use ndk::native_window::NativeWindow;
use once_cell::sync::OnceCell;
use orbit_scene::SceneEngine;
use orbit_session::{DrawSurface, EngineFactory, InitOptions};
use std::ptr::NonNull;

/// Application context handed over by `init_ndk_context`.
pub struct AndroidContext {
    vm: JavaVM,
    context: GlobalRef,
}

impl AndroidContext {
    pub fn new(env: &JNIEnv, context: &JObject) -> Result<Self> {
        let vm = env.get_java_vm().context("failed to get JavaVM")?;
        let context = env
            .new_global_ref(context)
            .context("failed to create global ref to context")?;
        Ok(Self { vm, context })
    }
}

/// The `ANativeWindow` behind a Java `Surface`.
pub struct AndroidSurface {
    window: NativeWindow,
}

impl AndroidSurface {
    pub fn from_java(env: &JNIEnv, surface: &JObject) -> Result<Self> {
        if surface.is_null() {
            bail!("surface is null");
        }
        let window = unsafe { NativeWindow::from_surface(env.get_raw(), surface.as_raw()) }
            .ok_or_else(|| anyhow!("failed to get ANativeWindow from Surface"))?;
        Ok(Self { window })
    }
}

impl DrawSurface for AndroidSurface {
    fn dimensions(&self) -> (u32, u32) {
        (
            self.window.width().max(0) as u32,
            self.window.height().max(0) as u32,
        )
    }
}

/// Native asset manager plus a global ref keeping its Java owner alive.
pub struct AndroidAssets {
    _manager: AssetManager,
    _owner: GlobalRef,
}

// SAFETY: AAssetManager is thread safe and the Java owner is pinned by the
// global ref for as long as this value lives.
unsafe impl Send for AndroidAssets {}

impl AndroidAssets {
    pub fn from_java(env: &JNIEnv, asset_manager: &JObject) -> Result<Self> {
        if asset_manager.is_null() {
            bail!("asset manager is null");
        }
        let owner = env
            .new_global_ref(asset_manager)
            .context("failed to create global ref to asset manager")?;
        let ptr = unsafe {
            ndk_sys::AAssetManager_fromJava(env.get_raw() as *mut _, asset_manager.as_raw() as _)
        };
        let ptr = NonNull::new(ptr).ok_or_else(|| anyhow!("AAssetManager_fromJava returned null"))?;
        Ok(Self {
            _manager: unsafe { AssetManager::from_ptr(ptr) },
            _owner: owner,
        })
    }
}

/// Engine factory for the device: installs the NDK context once and builds
/// scene engines on native windows.
#[derive(Default)]
pub struct AndroidFactory {
    // Kept for the process lifetime; ndk-context stores raw pointers into it.
    context: OnceCell<AndroidContext>,
}

impl EngineFactory for AndroidFactory {
    type Context = AndroidContext;
    type Assets = AndroidAssets;
    type Surface = AndroidSurface;
    type Engine = SceneEngine;

    fn init_context(&self, context: AndroidContext) -> Result<()> {
        if self.context.get().is_some() {
            bail!("ndk context already installed");
        }
        let context = self.context.get_or_init(|| context);
        unsafe {
            ndk_context::initialize_android_context(
                context.vm.get_java_vm_pointer() as _,
                context.context.as_obj().as_raw() as _,
            );
        }
        Ok(())
    }

    fn create(
        &self,
        _assets: &AndroidAssets,
        surface: &AndroidSurface,
        scale_factor: f32,
        options: &InitOptions,
    ) -> Result<SceneEngine> {
        Ok(SceneEngine::new(options, surface.dimensions(), scale_factor))
    }
}
