// orbit-sim: replay a host view's callback sequence on the desktop.
//
// Drives the same `SurfaceHost` + `SessionRegistry` pair the device uses, with
// the headless scene engine behind it, so a scripted gesture produces the
// camera position and scene document the device would export.

use anyhow::{Context, Result, bail};
use orbit_scene::{HeadlessSurface, SceneFactory};
use orbit_session::{
    FrameOutcome, InitOptions, MotionSample, Redraw, SceneDocument, SessionRegistry, SurfaceHost,
    TouchEvent,
};
use std::cell::Cell;

/// Standard gravity, used as the y component of a simulated tilt.
const GRAVITY: f32 = 9.81;

pub type HeadlessRegistry = SessionRegistry<SceneFactory<HeadlessSurface>>;

/// Counts redraw requests in place of a real view.
#[derive(Debug, Default)]
pub struct RedrawCounter(Cell<usize>);

impl RedrawCounter {
    pub fn count(&self) -> usize {
        self.0.get()
    }
}

impl Redraw for RedrawCounter {
    fn request_redraw(&self) {
        self.0.set(self.0.get() + 1);
    }
}

/// One scripted session.
#[derive(Debug, Clone)]
pub struct Script {
    pub surface: HeadlessSurface,
    pub scale_factor: f32,
    pub frames: u32,
    /// Single drag gesture in pixels, applied before the first frame.
    pub drag: Option<[f32; 2]>,
    /// Gravity x component held for the whole run.
    pub tilt: Option<f32>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            surface: HeadlessSurface {
                width: 1080,
                height: 2340,
            },
            scale_factor: 2.75,
            frames: 60,
            drag: None,
            tilt: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub frames: u64,
    pub redraws: usize,
    pub eye: [f32; 3],
    pub document: SceneDocument,
}

/// Run `script` from surface creation to surface destruction.
pub fn replay(options: &InitOptions, script: &Script) -> Result<Outcome> {
    let redraw = RedrawCounter::default();
    let (mut host, mut sink) =
        SurfaceHost::new(HeadlessRegistry::new(SceneFactory::new()), &redraw);

    let handle = host
        .surface_created((), (), script.surface, script.scale_factor, options)
        .context("session creation failed")?;
    tracing::info!("replaying {} frames on {}", script.frames, handle);

    if let Some(x) = script.tilt {
        sink.publish(MotionSample::new(x, GRAVITY, 0.0));
    }

    if let Some([dx, dy]) = script.drag {
        let x = script.surface.width as f32 / 2.0;
        let y = script.surface.height as f32 / 2.0;
        host.on_touch(TouchEvent::Down { x, y });
        host.on_touch(TouchEvent::Move {
            x: x + dx,
            y: y + dy,
        });
    }

    for frame in 0..script.frames {
        if let FrameOutcome::Skipped = host.on_draw() {
            bail!("frame {} skipped with an active session", frame);
        }
        if frame == 0 && script.drag.is_some() {
            host.on_touch(TouchEvent::Up);
        }
    }

    let engine = host
        .bridge()
        .engine(handle)
        .context("session vanished before teardown")?;
    let eye = engine.camera().eye().to_array();
    let document = engine.snapshot();
    let frames = host.frames();

    host.surface_destroyed();
    tracing::debug!("released {}", handle);

    Ok(Outcome {
        frames,
        redraws: redraw.count(),
        eye,
        document,
    })
}

/// Parse `"dx,dy"`.
pub fn parse_pair(text: &str) -> Result<[f32; 2]> {
    let Some((a, b)) = text.split_once(',') else {
        bail!("expected two comma-separated numbers, got {:?}", text);
    };
    let a: f32 = a.trim().parse().with_context(|| format!("bad number {:?}", a))?;
    let b: f32 = b.trim().parse().with_context(|| format!("bad number {:?}", b))?;
    Ok([a, b])
}
