use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=ANDROID_NDK_HOME");
    println!("cargo:rerun-if-env-changed=NDK_HOME");

    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("android") {
        return;
    }

    // liblog for android_logger
    println!("cargo:rustc-link-lib=log");

    let Ok(ndk_home) = env::var("ANDROID_NDK_HOME").or_else(|_| env::var("NDK_HOME")) else {
        println!("cargo:warning=ANDROID_NDK_HOME/NDK_HOME not set; relying on the linker's search path");
        return;
    };

    let triple = if target.contains("aarch64") {
        "aarch64-linux-android"
    } else if target.contains("armv7") {
        "arm-linux-androideabi"
    } else if target.contains("i686") {
        "i686-linux-android"
    } else {
        "x86_64-linux-android"
    };

    println!(
        "cargo:rustc-link-search=native={}/toolchains/llvm/prebuilt/linux-x86_64/sysroot/usr/lib/{}",
        ndk_home, triple
    );
}
