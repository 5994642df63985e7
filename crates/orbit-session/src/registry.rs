// In-process implementation of the native bridge.
//
// Owns every live engine, keyed by a handle that is never reused, so a stale
// or doubled release finds nothing to free.

use anyhow::{Result, anyhow, bail};
use std::collections::HashMap;
use std::num::NonZeroU64;

use crate::bridge::NativeBridge;
use crate::engine::{DrawSurface, Engine, EngineFactory};
use crate::handle::SessionHandle;
use crate::input::TouchEvent;
use crate::motion::MotionSample;
use crate::options::InitOptions;
use crate::scene::SceneObject;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ContextState {
    Uninitialized,
    Ready,
    /// Setup failed; rendering stays disabled for the process lifetime.
    Failed(String),
}

/// Resources held for one session. Field order is drop order: the engine
/// goes before the surface and assets it borrows from.
struct Session<F: EngineFactory> {
    engine: F::Engine,
    _surface: F::Surface,
    _assets: F::Assets,
}

pub struct SessionRegistry<F: EngineFactory> {
    factory: F,
    context: ContextState,
    sessions: HashMap<SessionHandle, Session<F>>,
    next_id: u64,
}

impl<F: EngineFactory> SessionRegistry<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            context: ContextState::Uninitialized,
            sessions: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn is_context_ready(&self) -> bool {
        self.context == ContextState::Ready
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Read access to a live session's engine.
    pub fn engine(&self, handle: SessionHandle) -> Option<&F::Engine> {
        self.sessions.get(&handle).map(|session| &session.engine)
    }

    fn mint_handle(&mut self) -> SessionHandle {
        let id = NonZeroU64::new(self.next_id).unwrap_or(NonZeroU64::MIN);
        self.next_id += 1;
        SessionHandle::new(id)
    }

    fn with_engine(&mut self, handle: SessionHandle, op: &str, f: impl FnOnce(&mut F::Engine)) {
        match self.sessions.get_mut(&handle) {
            Some(session) => f(&mut session.engine),
            None => log::debug!("{} dropped: {} is not live", op, handle),
        }
    }
}

impl<F: EngineFactory> NativeBridge for SessionRegistry<F> {
    type Context = F::Context;
    type Assets = F::Assets;
    type Surface = F::Surface;

    fn init_context(&mut self, context: Self::Context) -> Result<()> {
        match &self.context {
            ContextState::Ready => {
                log::debug!("native context already initialized");
                return Ok(());
            }
            ContextState::Failed(reason) => {
                log::warn!("native context init previously failed: {}", reason);
                return Ok(());
            }
            ContextState::Uninitialized => {}
        }

        match self.factory.init_context(context) {
            Ok(()) => {
                log::info!("native context initialized");
                self.context = ContextState::Ready;
                Ok(())
            }
            Err(e) => {
                log::error!("native context init failed: {:#}", e);
                self.context = ContextState::Failed(format!("{:#}", e));
                Err(e)
            }
        }
    }

    fn create_session(
        &mut self,
        assets: Self::Assets,
        surface: Self::Surface,
        scale_factor: f32,
        options: &InitOptions,
    ) -> Result<SessionHandle> {
        match &self.context {
            ContextState::Ready => {}
            ContextState::Uninitialized => bail!("native context not initialized"),
            ContextState::Failed(reason) => bail!("rendering disabled: {}", reason),
        }

        if !surface.is_attached() {
            bail!("surface is not attached");
        }
        let (width, height) = surface.dimensions();
        if width == 0 || height == 0 {
            bail!("surface has no drawable area ({}x{})", width, height);
        }
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            bail!("invalid scale factor {}", scale_factor);
        }
        options.validate()?;

        let engine = self
            .factory
            .create(&assets, &surface, scale_factor, options)
            .map_err(|e| anyhow!("engine creation failed: {:#}", e))?;

        let handle = self.mint_handle();
        self.sessions.insert(
            handle,
            Session {
                engine,
                _surface: surface,
                _assets: assets,
            },
        );
        log::info!(
            "created {} on {}x{} surface, scale {}",
            handle,
            width,
            height,
            scale_factor
        );
        Ok(handle)
    }

    fn enter_frame(&mut self, handle: SessionHandle) {
        self.with_engine(handle, "enter_frame", |engine| engine.update());
    }

    fn device_motion(&mut self, handle: SessionHandle, sample: MotionSample) {
        self.with_engine(handle, "device_motion", |engine| engine.motion(sample));
    }

    fn touch_enter(&mut self, handle: SessionHandle, x: f32, y: f32) {
        self.with_engine(handle, "touch_enter", |engine| {
            engine.touch(TouchEvent::Down { x, y })
        });
    }

    fn touch_move(&mut self, handle: SessionHandle, x: f32, y: f32) {
        self.with_engine(handle, "touch_move", |engine| {
            engine.touch(TouchEvent::Move { x, y })
        });
    }

    fn touch_exit(&mut self, handle: SessionHandle) {
        self.with_engine(handle, "touch_exit", |engine| engine.touch(TouchEvent::Up));
    }

    fn update_camera_offset(&mut self, handle: SessionHandle, offset: [f32; 3]) {
        self.with_engine(handle, "update_camera_offset", |engine| {
            engine.set_camera_offset(offset)
        });
    }

    fn import_mesh(&mut self, handle: SessionHandle, data: &[u8]) -> Result<()> {
        let session = self
            .sessions
            .get_mut(&handle)
            .ok_or_else(|| anyhow!("{} is not live", handle))?;
        session.engine.import_mesh(data)
    }

    fn current_object(&self, handle: SessionHandle) -> Option<SceneObject> {
        self.sessions.get(&handle)?.engine.current_object()
    }

    fn release_session(&mut self, handle: SessionHandle) {
        match self.sessions.remove(&handle) {
            Some(mut session) => {
                session.engine.shutdown();
                drop(session);
                log::info!("released {}", handle);
            }
            None => log::debug!("release of {} ignored: not live", handle),
        }
    }

    fn is_live(&self, handle: SessionHandle) -> bool {
        self.sessions.contains_key(&handle)
    }
}

impl<F: EngineFactory> Drop for SessionRegistry<F> {
    fn drop(&mut self) {
        for (handle, mut session) in self.sessions.drain() {
            log::debug!("releasing {} with registry", handle);
            session.engine.shutdown();
        }
    }
}
