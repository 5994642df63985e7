// The seam between the session lifecycle and the engine it drives.

use anyhow::Result;

use crate::input::TouchEvent;
use crate::motion::MotionSample;
use crate::options::InitOptions;
use crate::scene::SceneObject;

/// A drawable surface supplied by the host at session creation.
pub trait DrawSurface {
    /// Size in physical pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Whether the surface is still attached to the host view.
    fn is_attached(&self) -> bool {
        true
    }
}

/// One live engine instance bound to one surface.
pub trait Engine {
    /// Advance one update/render tick.
    fn update(&mut self);

    /// Latest device gravity sample, delivered right before `update`.
    fn motion(&mut self, sample: MotionSample);

    fn touch(&mut self, event: TouchEvent);

    fn set_camera_offset(&mut self, offset: [f32; 3]);

    /// Add a mesh from file bytes. The payload format belongs to the engine.
    fn import_mesh(&mut self, data: &[u8]) -> Result<()>;

    /// The object most recently added to the scene, if any.
    fn current_object(&self) -> Option<SceneObject>;

    /// Tear down engine resources. Called exactly once, before the engine
    /// and its surface are dropped.
    fn shutdown(&mut self) {}
}

/// Builds engines and performs the process-wide setup they depend on.
pub trait EngineFactory {
    /// Platform context needed by the one-time setup.
    type Context;
    /// Asset source bound to each session.
    type Assets;
    type Surface: DrawSurface;
    type Engine: Engine;

    /// Process-wide environment setup, run once before the first session.
    fn init_context(&self, context: Self::Context) -> Result<()>;

    fn create(
        &self,
        assets: &Self::Assets,
        surface: &Self::Surface,
        scale_factor: f32,
        options: &InitOptions,
    ) -> Result<Self::Engine>;
}
