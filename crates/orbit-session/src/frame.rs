// Cooperative frame loop: one draw callback in, at most one redraw request
// out. Pacing and dropped frames are left to the host compositor.

use crate::bridge::NativeBridge;
use crate::handle::SessionHandle;
use crate::motion::MotionSource;

/// The host's invalidate mechanism.
pub trait Redraw {
    /// Ask the host for one more draw callback on its next refresh.
    fn request_redraw(&self);
}

impl<R: Redraw + ?Sized> Redraw for &R {
    fn request_redraw(&self) {
        (**self).request_redraw();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The session advanced; `frame` counts ticks driven so far.
    Ticked { frame: u64 },
    /// No session: nothing was forwarded and no redraw was requested.
    Skipped,
}

#[derive(Debug, Default)]
pub struct FrameDriver {
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Handle one draw callback: hand the latest motion sample to the
    /// session, tick it once, then re-arm through `redraw`.
    pub fn tick<B: NativeBridge, R: Redraw>(
        &mut self,
        bridge: &mut B,
        session: Option<SessionHandle>,
        motion: &mut MotionSource,
        redraw: &R,
    ) -> FrameOutcome {
        let Some(handle) = session else {
            return FrameOutcome::Skipped;
        };

        bridge.device_motion(handle, motion.latest());
        bridge.enter_frame(handle);
        self.frames += 1;

        redraw.request_redraw();
        FrameOutcome::Ticked { frame: self.frames }
    }
}
