use anyhow::{Context as _, Result, bail};
use glam::Vec3;
use orbit_session::{
    DrawSurface, Engine, EngineFactory, InitOptions, MotionSample, Rgb, SceneDocument,
    SceneObject, TouchEvent,
};
use std::marker::PhantomData;

use crate::camera::OrbitCamera;
use crate::steering::Steer;
use crate::touch::TouchTracker;

// ---------------------------------------------------------------------------
// SceneEngine
// ---------------------------------------------------------------------------

/// Scene state for one session: camera, input state and placed objects.
#[derive(Debug)]
pub struct SceneEngine {
    camera: OrbitCamera,
    touch: TouchTracker,
    steer: Steer,
    move_strength: f32,
    background: Rgb,
    light: Rgb,
    light_strength: f32,
    objects: Vec<SceneObject>,
    viewport: (u32, u32),
    scale_factor: f32,
    frame: u64,
    imported: usize,
    running: bool,
}

impl SceneEngine {
    pub fn new(options: &InitOptions, viewport: (u32, u32), scale_factor: f32) -> Self {
        let camera = options
            .scene
            .camera_pos
            .and_then(|pos| OrbitCamera::from_position(Vec3::from_array(pos)))
            .unwrap_or_default();

        Self {
            camera,
            touch: TouchTracker::default(),
            steer: Steer::Neutral,
            move_strength: options.move_strength,
            background: options.background_color,
            light: options.environment_light_color,
            light_strength: options.environment_light_strength,
            objects: options.scene.objects.clone(),
            viewport,
            scale_factor,
            frame: 0,
            imported: 0,
            running: true,
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn steer(&self) -> Steer {
        self.steer
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn light(&self) -> Rgb {
        self.light
    }

    pub fn light_strength(&self) -> f32 {
        self.light_strength
    }

    pub fn move_strength(&self) -> f32 {
        self.move_strength
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Viewport size in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.viewport.0 as f32 / self.scale_factor,
            self.viewport.1 as f32 / self.scale_factor,
        )
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.viewport.0 as f32 / self.viewport.1.max(1) as f32
    }

    /// Export the scene as the UI layer stores it.
    pub fn snapshot(&self) -> SceneDocument {
        SceneDocument {
            objects: self.objects.clone(),
            camera_pos: Some(self.camera.eye().to_array()),
        }
    }
}

impl Engine for SceneEngine {
    fn update(&mut self) {
        if !self.running {
            return;
        }
        if let Some(delta) = self.touch.take_delta() {
            if delta != glam::Vec2::ZERO {
                self.camera.drag(delta, self.move_strength);
            }
        }
        self.camera
            .rotate_azimuth(self.steer.azimuth_step(self.move_strength));
        self.frame += 1;
    }

    fn motion(&mut self, sample: MotionSample) {
        self.steer = Steer::from_motion(sample);
    }

    fn touch(&mut self, event: TouchEvent) {
        self.touch.apply(event);
    }

    /// The offset is the camera position relative to the orbit target.
    fn set_camera_offset(&mut self, offset: [f32; 3]) {
        match OrbitCamera::from_position(Vec3::from_array(offset)) {
            Some(camera) => self.camera = camera,
            None => log::warn!("ignoring degenerate camera offset {:?}", offset),
        }
    }

    fn import_mesh(&mut self, data: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(data).context("mesh data must be UTF-8 text")?;
        if text.trim().is_empty() {
            bail!("mesh data is empty");
        }
        self.imported += 1;
        let label = format!("import-{}", self.imported);
        log::info!("imported mesh {} ({} bytes)", label, data.len());
        self.objects.push(SceneObject {
            data: text.to_string(),
            kind: "mesh".to_string(),
            label,
            color: Rgb::white(),
            pos: [0.0; 3],
            scale: 1.0,
        });
        Ok(())
    }

    fn current_object(&self) -> Option<SceneObject> {
        self.objects.last().cloned()
    }

    fn shutdown(&mut self) {
        log::info!(
            "scene engine shutting down after {} frames, {} objects",
            self.frame,
            self.objects.len()
        );
        self.running = false;
        self.objects.clear();
    }
}

// ---------------------------------------------------------------------------
// Headless factory
// ---------------------------------------------------------------------------

/// Off-screen surface of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessSurface {
    pub width: u32,
    pub height: u32,
}

impl DrawSurface for HeadlessSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Builds scene engines for any surface type; no platform context needed.
pub struct SceneFactory<S> {
    _surface: PhantomData<fn(S)>,
}

impl<S> SceneFactory<S> {
    pub fn new() -> Self {
        Self {
            _surface: PhantomData,
        }
    }
}

impl<S> Default for SceneFactory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DrawSurface> EngineFactory for SceneFactory<S> {
    type Context = ();
    type Assets = ();
    type Surface = S;
    type Engine = SceneEngine;

    fn init_context(&self, _context: ()) -> Result<()> {
        log::debug!("headless scene factory needs no platform context");
        Ok(())
    }

    fn create(
        &self,
        _assets: &(),
        surface: &S,
        scale_factor: f32,
        options: &InitOptions,
    ) -> Result<SceneEngine> {
        Ok(SceneEngine::new(options, surface.dimensions(), scale_factor))
    }
}
