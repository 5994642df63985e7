// Entry points addressed by the raw 64-bit handle the host language stores.
//
// `0` (and any negative value) means "no session". Every function here turns
// the raw value back into an optional handle before touching the bridge, so a
// host that forgets to clear its field after release only reaches a dropped
// call. Errors never propagate past this layer: they are logged and mapped to
// the sentinel or to nothing.

use anyhow::Result;
use orbit_session::{InitOptions, MotionSample, NO_SESSION_RAW, NativeBridge, SessionHandle};

fn session(raw: i64, op: &str) -> Option<SessionHandle> {
    let handle = SessionHandle::from_raw(raw);
    if handle.is_none() {
        log::debug!("{} called without a session", op);
    }
    handle
}

/// Parse the options document passed at creation. An empty string selects
/// the defaults.
pub fn parse_options(json: &str) -> Result<InitOptions> {
    if json.trim().is_empty() {
        return Ok(InitOptions::default());
    }
    InitOptions::from_json(json)
}

pub fn init_context<B: NativeBridge>(bridge: &mut B, context: B::Context) -> bool {
    match bridge.init_context(context) {
        Ok(()) => true,
        Err(e) => {
            log::error!("init_ndk_context failed: {:#}", e);
            false
        }
    }
}

/// Create a session, returning its raw handle or the sentinel.
pub fn create<B: NativeBridge>(
    bridge: &mut B,
    assets: B::Assets,
    surface: B::Surface,
    scale_factor: f32,
    options: Result<InitOptions>,
) -> i64 {
    let options = match options {
        Ok(options) => options,
        Err(e) => {
            log::error!("create_bevy_app: bad options: {:#}", e);
            return NO_SESSION_RAW;
        }
    };
    match bridge.create_session(assets, surface, scale_factor, &options) {
        Ok(handle) => handle.into_raw(),
        Err(e) => {
            log::error!("create_bevy_app failed: {:#}", e);
            NO_SESSION_RAW
        }
    }
}

pub fn enter_frame<B: NativeBridge>(bridge: &mut B, raw: i64) {
    if let Some(handle) = session(raw, "enter_frame") {
        bridge.enter_frame(handle);
    }
}

pub fn device_motion<B: NativeBridge>(bridge: &mut B, raw: i64, sample: MotionSample) {
    if let Some(handle) = session(raw, "device_motion") {
        bridge.device_motion(handle, sample);
    }
}

pub fn touch_enter<B: NativeBridge>(bridge: &mut B, raw: i64, x: f32, y: f32) {
    if let Some(handle) = session(raw, "device_enter_touch") {
        bridge.touch_enter(handle, x, y);
    }
}

pub fn touch_move<B: NativeBridge>(bridge: &mut B, raw: i64, x: f32, y: f32) {
    if let Some(handle) = session(raw, "device_touch_move") {
        bridge.touch_move(handle, x, y);
    }
}

pub fn touch_exit<B: NativeBridge>(bridge: &mut B, raw: i64) {
    if let Some(handle) = session(raw, "device_exit_touch") {
        bridge.touch_exit(handle);
    }
}

pub fn update_camera_offset<B: NativeBridge>(bridge: &mut B, raw: i64, offset: [f32; 3]) {
    if let Some(handle) = session(raw, "update_camera_offset") {
        bridge.update_camera_offset(handle, offset);
    }
}

pub fn import_mesh<B: NativeBridge>(bridge: &mut B, raw: i64, data: &[u8]) {
    let Some(handle) = session(raw, "import_mesh") else {
        return;
    };
    if let Err(e) = bridge.import_mesh(handle, data) {
        log::error!("import_mesh into {} failed: {:#}", handle, e);
    }
}

/// JSON of the session's current object, or an empty string.
pub fn current_object_json<B: NativeBridge>(bridge: &B, raw: i64) -> String {
    let Some(object) = session(raw, "get_mesh").and_then(|h| bridge.current_object(h)) else {
        return String::new();
    };
    match serde_json::to_string(&object) {
        Ok(json) => json,
        Err(e) => {
            log::error!("get_mesh: cannot encode object: {}", e);
            String::new()
        }
    }
}

pub fn release<B: NativeBridge>(bridge: &mut B, raw: i64) {
    if let Some(handle) = session(raw, "release_bevy_app") {
        bridge.release_session(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_scene::{HeadlessSurface, SceneFactory};
    use orbit_session::SessionRegistry;

    type Registry = SessionRegistry<SceneFactory<HeadlessSurface>>;

    const SURFACE: HeadlessSurface = HeadlessSurface {
        width: 720,
        height: 1280,
    };

    fn ready() -> Registry {
        let mut reg = Registry::new(SceneFactory::new());
        assert!(init_context(&mut reg, ()));
        reg
    }

    #[test]
    fn empty_options_mean_defaults() {
        assert_eq!(parse_options("").unwrap(), InitOptions::default());
        assert!(parse_options("{not json").is_err());
    }

    #[test]
    fn create_without_context_returns_sentinel() {
        let mut reg = Registry::new(SceneFactory::new());
        let raw = create(&mut reg, (), SURFACE, 2.0, parse_options(""));
        assert_eq!(raw, NO_SESSION_RAW);
    }

    #[test]
    fn bad_options_return_sentinel() {
        let mut reg = ready();
        let raw = create(&mut reg, (), SURFACE, 2.0, parse_options("[1,2"));
        assert_eq!(raw, NO_SESSION_RAW);
        assert_eq!(reg.live_sessions(), 0);
    }

    #[test]
    fn sentinel_calls_are_ignored() {
        let mut reg = ready();
        enter_frame(&mut reg, NO_SESSION_RAW);
        touch_enter(&mut reg, NO_SESSION_RAW, 1.0, 1.0);
        touch_exit(&mut reg, -5);
        import_mesh(&mut reg, NO_SESSION_RAW, b"v 0 0 0");
        release(&mut reg, NO_SESSION_RAW);
        assert_eq!(current_object_json(&reg, NO_SESSION_RAW), "");
    }

    #[test]
    fn negative_handle_import_leaves_live_session_untouched() {
        let mut reg = ready();
        let raw = create(&mut reg, (), SURFACE, 2.0, parse_options(""));
        import_mesh(&mut reg, -raw, b"v 0 0 0\n");
        import_mesh(&mut reg, i64::MIN, b"v 0 0 0\n");
        assert_eq!(current_object_json(&reg, raw), "");
        assert_eq!(reg.live_sessions(), 1);
    }

    #[test]
    fn full_cycle_through_raw_handles() {
        let mut reg = ready();
        let raw = create(&mut reg, (), SURFACE, 2.0, parse_options(""));
        assert!(raw > 0);

        device_motion(&mut reg, raw, MotionSample::new(0.5, 9.8, 0.0));
        touch_enter(&mut reg, raw, 10.0, 10.0);
        touch_move(&mut reg, raw, 20.0, 10.0);
        enter_frame(&mut reg, raw);
        touch_exit(&mut reg, raw);
        update_camera_offset(&mut reg, raw, [1.0, 2.0, 3.0]);

        assert_eq!(current_object_json(&reg, raw), "");
        import_mesh(&mut reg, raw, b"v 0 0 0\n");
        let json = current_object_json(&reg, raw);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "mesh");
        assert_eq!(value["label"], "import-1");

        release(&mut reg, raw);
        release(&mut reg, raw);
        assert_eq!(reg.live_sessions(), 0);
        enter_frame(&mut reg, raw);
        assert_eq!(current_object_json(&reg, raw), "");
    }
}
