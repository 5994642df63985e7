// orbit-session: lifecycle of one embedded engine session per drawing surface.
//
// The host platform owns the surface and delivers lifecycle, draw, touch and
// sensor callbacks. This crate turns those callbacks into calls on a
// `NativeBridge`, keeping the session handle, the frame loop and the motion
// buffer in one controller object.

pub mod bridge;
pub mod engine;
pub mod frame;
pub mod handle;
pub mod host;
pub mod input;
pub mod motion;
pub mod options;
pub mod registry;
pub mod scene;

pub use bridge::NativeBridge;
pub use engine::{DrawSurface, Engine, EngineFactory};
pub use frame::{FrameDriver, FrameOutcome, Redraw};
pub use handle::{NO_SESSION_RAW, SessionHandle};
pub use host::{HostState, SurfaceHost};
pub use input::TouchEvent;
pub use motion::{MotionSample, MotionSink, MotionSource, motion_channel};
pub use options::{DEFAULT_LIGHT_STRENGTH, DEFAULT_MOVE_STRENGTH, InitOptions, Rgb};
pub use registry::SessionRegistry;
pub use scene::{SceneDocument, SceneObject};
