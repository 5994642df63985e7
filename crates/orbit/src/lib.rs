// Orbit Android library - scene sessions driven from a Kotlin SurfaceView

// Raw-handle entry points shared by the JNI exports
pub mod raw;

// NDK context, surface and asset wrappers
#[cfg(target_os = "android")]
pub mod android_platform;

// `RustBridge` JNI exports, one process-wide registry
#[cfg(target_os = "android")]
pub mod android_jni;

// `BevySurfaceView` JNI exports, host controller owned by the view
#[cfg(target_os = "android")]
pub mod android_view;
