// orbit-scene: the engine state behind a session, without the GPU.
//
// Touch drags orbit the camera around the scene origin, device tilt steers
// it, and imported meshes are kept as scene objects that can be exported
// back to the UI layer.

pub mod camera;
pub mod engine;
pub mod steering;
pub mod touch;

pub use camera::OrbitCamera;
pub use engine::{HeadlessSurface, SceneEngine, SceneFactory};
pub use steering::Steer;
pub use touch::TouchTracker;
