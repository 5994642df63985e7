use crate::bridge::NativeBridge;
use crate::handle::SessionHandle;

// Android MotionEvent action codes
const ACTION_DOWN: i32 = 0;
const ACTION_UP: i32 = 1;
const ACTION_MOVE: i32 = 2;
const ACTION_CANCEL: i32 = 3;

/// Single-pointer touch stream. `Up` carries no position; the engine keeps
/// its own last position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
}

impl TouchEvent {
    /// Map an Android `MotionEvent` action. Cancel ends the stream like `Up`;
    /// other actions (pointer down/up for extra fingers, hover) are ignored.
    pub fn from_android_action(action: i32, x: f32, y: f32) -> Option<Self> {
        match action {
            ACTION_DOWN => Some(Self::Down { x, y }),
            ACTION_MOVE => Some(Self::Move { x, y }),
            ACTION_UP | ACTION_CANCEL => Some(Self::Up),
            _ => None,
        }
    }
}

/// Forward a touch event to the active session.
///
/// Returns `false` without touching the bridge when there is no session.
pub fn relay_touch<B: NativeBridge>(
    bridge: &mut B,
    session: Option<SessionHandle>,
    event: TouchEvent,
) -> bool {
    let Some(handle) = session else {
        log::trace!("dropping {:?}: no active session", event);
        return false;
    };
    match event {
        TouchEvent::Down { x, y } => bridge.touch_enter(handle, x, y),
        TouchEvent::Move { x, y } => bridge.touch_move(handle, x, y),
        TouchEvent::Up => bridge.touch_exit(handle),
    }
    true
}
