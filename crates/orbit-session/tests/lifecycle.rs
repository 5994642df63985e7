// Surface host lifecycle tests against a bridge that records every native
// call it receives.

use std::cell::Cell;
use std::num::NonZeroU64;

use anyhow::{Result, bail};
use orbit_session::{
    FrameOutcome, HostState, InitOptions, MotionSample, NativeBridge, Redraw, SceneObject,
    SessionHandle, SurfaceHost, TouchEvent,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Init,
    Create,
    Frame(SessionHandle),
    Motion(SessionHandle, MotionSample),
    Enter(SessionHandle, f32, f32),
    Move(SessionHandle, f32, f32),
    Exit(SessionHandle),
    Camera(SessionHandle, [f32; 3]),
    Import(SessionHandle, usize),
    Release(SessionHandle),
}

/// Records calls and tracks which handles are live, like the native side
/// would.
#[derive(Default)]
struct RecordingBridge {
    calls: Vec<Call>,
    live: Vec<SessionHandle>,
    next: u64,
    /// Native teardowns actually performed.
    teardowns: usize,
    fail_surface: bool,
}

impl RecordingBridge {
    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn assert_live(&self, handle: SessionHandle) {
        assert!(
            self.live.contains(&handle),
            "native call issued against dead {}",
            handle
        );
    }
}

impl NativeBridge for RecordingBridge {
    type Context = ();
    type Assets = ();
    type Surface = &'static str;

    fn init_context(&mut self, _context: ()) -> Result<()> {
        self.calls.push(Call::Init);
        Ok(())
    }

    fn create_session(
        &mut self,
        _assets: (),
        surface: &'static str,
        _scale_factor: f32,
        _options: &InitOptions,
    ) -> Result<SessionHandle> {
        self.calls.push(Call::Create);
        if self.fail_surface {
            bail!("cannot acquire {}", surface);
        }
        self.next += 1;
        let handle = SessionHandle::new(NonZeroU64::new(self.next).unwrap());
        self.live.push(handle);
        Ok(handle)
    }

    fn enter_frame(&mut self, handle: SessionHandle) {
        self.assert_live(handle);
        self.calls.push(Call::Frame(handle));
    }

    fn device_motion(&mut self, handle: SessionHandle, sample: MotionSample) {
        self.assert_live(handle);
        self.calls.push(Call::Motion(handle, sample));
    }

    fn touch_enter(&mut self, handle: SessionHandle, x: f32, y: f32) {
        self.assert_live(handle);
        self.calls.push(Call::Enter(handle, x, y));
    }

    fn touch_move(&mut self, handle: SessionHandle, x: f32, y: f32) {
        self.assert_live(handle);
        self.calls.push(Call::Move(handle, x, y));
    }

    fn touch_exit(&mut self, handle: SessionHandle) {
        self.assert_live(handle);
        self.calls.push(Call::Exit(handle));
    }

    fn update_camera_offset(&mut self, handle: SessionHandle, offset: [f32; 3]) {
        self.assert_live(handle);
        self.calls.push(Call::Camera(handle, offset));
    }

    fn import_mesh(&mut self, handle: SessionHandle, data: &[u8]) -> Result<()> {
        self.assert_live(handle);
        self.calls.push(Call::Import(handle, data.len()));
        Ok(())
    }

    fn current_object(&self, _handle: SessionHandle) -> Option<SceneObject> {
        None
    }

    fn release_session(&mut self, handle: SessionHandle) {
        self.calls.push(Call::Release(handle));
        if let Some(pos) = self.live.iter().position(|h| *h == handle) {
            self.live.remove(pos);
            self.teardowns += 1;
        }
    }

    fn is_live(&self, handle: SessionHandle) -> bool {
        self.live.contains(&handle)
    }
}

#[derive(Default)]
struct CountingRedraw {
    requests: Cell<usize>,
}

impl Redraw for CountingRedraw {
    fn request_redraw(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

fn create(host: &mut SurfaceHost<RecordingBridge, &CountingRedraw>) -> Result<SessionHandle> {
    host.surface_created((), (), "surface", 2.75, &InitOptions::default())
}

#[test]
fn scenario_a_full_lifecycle() {
    let redraw = CountingRedraw::default();
    let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    assert_eq!(host.state(), HostState::NoSession);

    let handle = create(&mut host).unwrap();
    assert_eq!(host.state(), HostState::SessionActive(handle));
    assert_eq!(redraw.requests.get(), 1, "creation starts the frame loop");

    assert_eq!(host.on_draw(), FrameOutcome::Ticked { frame: 1 });
    assert_eq!(redraw.requests.get(), 2);
    assert!(host.bridge().calls.contains(&Call::Frame(handle)));

    host.surface_destroyed();
    assert_eq!(host.state(), HostState::NoSession);
    assert_eq!(host.bridge().calls.last(), Some(&Call::Release(handle)));
    assert!(!host.bridge().is_live(handle));
}

#[test]
fn scenario_b_touch_without_session_is_dropped() {
    let redraw = CountingRedraw::default();
    let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    assert!(!host.on_touch(TouchEvent::Down { x: 10.0, y: 20.0 }));
    assert!(host.bridge().calls.is_empty());
}

#[test]
fn scenario_c_touch_stream_is_forwarded() {
    let redraw = CountingRedraw::default();
    let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    let h = create(&mut host).unwrap();

    assert!(host.on_touch(TouchEvent::Down { x: 10.0, y: 20.0 }));
    assert!(host.on_touch(TouchEvent::Move { x: 15.0, y: 25.0 }));
    assert!(host.on_touch(TouchEvent::Up));

    let touches: Vec<_> = host
        .bridge()
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Enter(..) | Call::Move(..) | Call::Exit(..)))
        .cloned()
        .collect();
    assert_eq!(
        touches,
        vec![
            Call::Enter(h, 10.0, 20.0),
            Call::Move(h, 15.0, 25.0),
            Call::Exit(h),
        ]
    );
}

#[test]
fn scenario_d_latest_motion_accompanies_next_frame() {
    let redraw = CountingRedraw::default();
    let (mut host, mut sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    let h = create(&mut host).unwrap();

    host.on_draw();
    sink.publish(MotionSample::new(5.0, 5.0, 5.0));
    sink.publish(MotionSample::new(0.1, 9.8, 0.2));
    host.on_draw();

    let calls = &host.bridge().calls;
    let n = calls.len();
    assert_eq!(
        calls[n - 2],
        Call::Motion(h, MotionSample::new(0.1, 9.8, 0.2))
    );
    assert_eq!(calls[n - 1], Call::Frame(h));
}

#[test]
fn draw_without_session_ends_the_loop() {
    let redraw = CountingRedraw::default();
    let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    assert_eq!(host.on_draw(), FrameOutcome::Skipped);
    assert_eq!(redraw.requests.get(), 0);
    assert!(host.bridge().calls.is_empty());
}

#[test]
fn surface_changed_redraws_only_with_a_session() {
    let redraw = CountingRedraw::default();
    let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    host.surface_changed(1080, 2340);
    assert_eq!(redraw.requests.get(), 0);

    create(&mut host).unwrap();
    let before = redraw.requests.get();
    host.surface_changed(2340, 1080);
    assert_eq!(redraw.requests.get(), before + 1);
    // Resize is not a native call.
    assert_eq!(host.bridge().count(|c| *c == Call::Create), 1);
    assert_eq!(host.bridge().calls.len(), 2);

    host.surface_destroyed();
    let after_release = redraw.requests.get();
    host.surface_changed(1080, 2340);
    assert_eq!(redraw.requests.get(), after_release);
}

#[test]
fn each_draw_requests_exactly_one_redraw() {
    let redraw = CountingRedraw::default();
    let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    create(&mut host).unwrap();
    let before = redraw.requests.get();
    for _ in 0..10 {
        host.on_draw();
    }
    assert_eq!(redraw.requests.get(), before + 10);
    assert_eq!(host.frames(), 10);
}

#[test]
fn second_surface_created_keeps_existing_session() {
    let redraw = CountingRedraw::default();
    let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    let first = create(&mut host).unwrap();
    let second = create(&mut host).unwrap();
    assert_eq!(first, second);
    assert_eq!(host.bridge().count(|c| *c == Call::Create), 1);
}

#[test]
fn release_twice_tears_down_once() {
    let redraw = CountingRedraw::default();
    let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    create(&mut host).unwrap();
    host.surface_destroyed();
    host.surface_destroyed();
    assert_eq!(host.bridge().count(|c| matches!(c, Call::Release(_))), 1);
    assert_eq!(host.bridge().teardowns, 1);
}

#[test]
fn context_initialized_once_across_cycles() {
    let redraw = CountingRedraw::default();
    let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    for _ in 0..5 {
        create(&mut host).unwrap();
        host.on_draw();
        host.surface_destroyed();
    }
    let bridge = host.bridge();
    assert_eq!(bridge.count(|c| *c == Call::Init), 1);
    assert_eq!(bridge.calls.first(), Some(&Call::Init));
    assert_eq!(bridge.count(|c| *c == Call::Create), 5);
    assert_eq!(bridge.teardowns, 5);
}

#[test]
fn surface_acquisition_failure_leaves_no_session() {
    let redraw = CountingRedraw::default();
    let bridge = RecordingBridge {
        fail_surface: true,
        ..Default::default()
    };
    let (mut host, _sink) = SurfaceHost::new(bridge, &redraw);
    assert!(create(&mut host).is_err());
    assert_eq!(host.state(), HostState::NoSession);
    assert_eq!(redraw.requests.get(), 0);
    assert_eq!(host.on_draw(), FrameOutcome::Skipped);
}

#[test]
fn camera_and_import_need_a_session() {
    let redraw = CountingRedraw::default();
    let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
    host.update_camera_offset([1.0, 2.0, 3.0]);
    assert!(!host.import_mesh(b"v 0 0 0").unwrap());
    assert!(host.bridge().calls.is_empty());

    let h = create(&mut host).unwrap();
    host.update_camera_offset([1.0, 2.0, 3.0]);
    assert!(host.import_mesh(b"v 0 0 0").unwrap());
    assert!(host.bridge().calls.contains(&Call::Camera(h, [1.0, 2.0, 3.0])));
    assert!(host.bridge().calls.contains(&Call::Import(h, 7)));
}

#[derive(Debug, Clone, Copy)]
enum Event {
    Created,
    Destroyed,
    Draw,
    Touch,
}

const EVENTS: [Event; 4] = [Event::Created, Event::Destroyed, Event::Draw, Event::Touch];

/// Every sequence of six host callbacks keeps native calls on live handles
/// (checked inside the bridge) and never leaks or doubles a teardown. State
/// is checked after each event, so every prefix is covered too.
#[test]
fn every_callback_sequence_respects_handle_validity() {
    let mut sequences: Vec<Vec<Event>> = vec![vec![]];
    for _ in 0..6 {
        sequences = sequences
            .iter()
            .flat_map(|seq| {
                EVENTS.iter().map(move |event| {
                    let mut next = seq.clone();
                    next.push(*event);
                    next
                })
            })
            .collect();
    }
    assert_eq!(sequences.len(), 4096);
    run_sequences(&sequences);
}

fn run_sequences(sequences: &[Vec<Event>]) {
    for seq in sequences {
        let redraw = CountingRedraw::default();
        let (mut host, _sink) = SurfaceHost::new(RecordingBridge::default(), &redraw);
        for event in seq {
            match event {
                Event::Created => {
                    create(&mut host).unwrap();
                }
                Event::Destroyed => host.surface_destroyed(),
                Event::Draw => {
                    host.on_draw();
                }
                Event::Touch => {
                    host.on_touch(TouchEvent::Move { x: 1.0, y: 1.0 });
                }
            }
            let live = host.bridge().live.len();
            assert!(live <= 1, "{:?}: {} live sessions", seq, live);
            assert_eq!(host.session().is_some(), live == 1, "{:?}", seq);
        }
        let creates = host.bridge().count(|c| *c == Call::Create);
        let teardowns = host.bridge().teardowns;
        let still_live = host.bridge().live.len();
        assert_eq!(creates, teardowns + still_live, "{:?}", seq);
        assert!(host.bridge().count(|c| *c == Call::Init) <= 1);
    }
}
