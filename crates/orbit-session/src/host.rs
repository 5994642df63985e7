/// Surface host controller
///
/// Binds one drawing surface to at most one engine session and routes the
/// host view's callbacks (surface lifecycle, draw, touch) through the bridge.
/// The session handle lives here as an owned field; nothing else holds it.
///
/// ```text
/// NoSession --surface_created--> SessionActive
/// SessionActive --on_draw--> SessionActive (one redraw request)
/// SessionActive --surface_destroyed--> NoSession
/// ```
use anyhow::Result;

use crate::bridge::NativeBridge;
use crate::frame::{FrameDriver, FrameOutcome, Redraw};
use crate::handle::SessionHandle;
use crate::input::{TouchEvent, relay_touch};
use crate::motion::{MotionSink, MotionSource, motion_channel};
use crate::options::InitOptions;
use crate::scene::SceneObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    NoSession,
    SessionActive(SessionHandle),
}

pub struct SurfaceHost<B: NativeBridge, R: Redraw> {
    bridge: B,
    redraw: R,
    /// Set before the first init attempt; init is never retried.
    context_requested: bool,
    session: Option<SessionHandle>,
    motion: MotionSource,
    frames: FrameDriver,
}

impl<B: NativeBridge, R: Redraw> SurfaceHost<B, R> {
    /// Create a host with no session. The returned sink belongs to the
    /// sensor listener.
    pub fn new(bridge: B, redraw: R) -> (Self, MotionSink) {
        let (sink, source) = motion_channel();
        let host = Self {
            bridge,
            redraw,
            context_requested: false,
            session: None,
            motion: source,
            frames: FrameDriver::new(),
        };
        (host, sink)
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn session(&self) -> Option<SessionHandle> {
        self.session
    }

    pub fn state(&self) -> HostState {
        match self.session {
            Some(handle) => HostState::SessionActive(handle),
            None => HostState::NoSession,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames.frames()
    }

    /// Surface became ready: initialise the native context on first use and
    /// create a session unless one is already active.
    pub fn surface_created(
        &mut self,
        context: B::Context,
        assets: B::Assets,
        surface: B::Surface,
        scale_factor: f32,
        options: &InitOptions,
    ) -> Result<SessionHandle> {
        if !self.context_requested {
            self.context_requested = true;
            self.bridge.init_context(context)?;
        }

        if let Some(handle) = self.session {
            log::debug!("surface created while {} is active; keeping it", handle);
            return Ok(handle);
        }

        let handle = match self
            .bridge
            .create_session(assets, surface, scale_factor, options)
        {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("session creation failed: {:#}", e);
                return Err(e);
            }
        };
        self.session = Some(handle);

        // Start the frame loop.
        self.redraw.request_redraw();
        Ok(handle)
    }

    pub fn surface_changed(&mut self, width: u32, height: u32) {
        log::info!("surface changed: {}x{}", width, height);
        if self.session.is_some() {
            self.redraw.request_redraw();
        }
    }

    /// Surface is going away: release the session before the host frees it.
    pub fn surface_destroyed(&mut self) {
        if let Some(handle) = self.session.take() {
            self.bridge.release_session(handle);
        }
    }

    /// Draw callback from the host.
    pub fn on_draw(&mut self) -> FrameOutcome {
        self.frames
            .tick(&mut self.bridge, self.session, &mut self.motion, &self.redraw)
    }

    /// Returns whether the event reached a session.
    pub fn on_touch(&mut self, event: TouchEvent) -> bool {
        relay_touch(&mut self.bridge, self.session, event)
    }

    pub fn update_camera_offset(&mut self, offset: [f32; 3]) {
        if let Some(handle) = self.session {
            self.bridge.update_camera_offset(handle, offset);
        }
    }

    /// Import a mesh into the active session. Without a session the data is
    /// dropped and `Ok(false)` returned.
    pub fn import_mesh(&mut self, data: &[u8]) -> Result<bool> {
        match self.session {
            Some(handle) => {
                self.bridge.import_mesh(handle, data)?;
                Ok(true)
            }
            None => {
                log::debug!("mesh import dropped: no active session");
                Ok(false)
            }
        }
    }

    pub fn current_object(&self) -> Option<SceneObject> {
        self.bridge.current_object(self.session?)
    }
}

impl<B: NativeBridge, R: Redraw> Drop for SurfaceHost<B, R> {
    fn drop(&mut self) {
        self.surface_destroyed();
    }
}
