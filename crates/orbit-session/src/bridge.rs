// Entry points of the native engine, addressed by session handle.
//
// Forwarding calls (`enter_frame`, motion, touch, camera) never fail: a call
// against an unknown or released handle is dropped. Only session creation and
// mesh import report errors.

use anyhow::Result;

use crate::handle::SessionHandle;
use crate::motion::MotionSample;
use crate::options::InitOptions;
use crate::scene::SceneObject;

pub trait NativeBridge {
    type Context;
    type Assets;
    type Surface;

    /// Process-wide environment setup. Must precede the first
    /// `create_session`; repeated calls are no-ops.
    fn init_context(&mut self, context: Self::Context) -> Result<()>;

    /// Allocate an engine bound to `surface`. Fails when the surface cannot
    /// be acquired; the caller gets no handle and must not retry.
    fn create_session(
        &mut self,
        assets: Self::Assets,
        surface: Self::Surface,
        scale_factor: f32,
        options: &InitOptions,
    ) -> Result<SessionHandle>;

    /// Drive exactly one update/render tick.
    fn enter_frame(&mut self, handle: SessionHandle);

    fn device_motion(&mut self, handle: SessionHandle, sample: MotionSample);

    fn touch_enter(&mut self, handle: SessionHandle, x: f32, y: f32);

    fn touch_move(&mut self, handle: SessionHandle, x: f32, y: f32);

    fn touch_exit(&mut self, handle: SessionHandle);

    fn update_camera_offset(&mut self, handle: SessionHandle, offset: [f32; 3]);

    fn import_mesh(&mut self, handle: SessionHandle, data: &[u8]) -> Result<()>;

    fn current_object(&self, handle: SessionHandle) -> Option<SceneObject>;

    /// Tear down everything bound to `handle`. Releasing an unknown or
    /// already released handle does nothing.
    fn release_session(&mut self, handle: SessionHandle);

    fn is_live(&self, handle: SessionHandle) -> bool;
}
