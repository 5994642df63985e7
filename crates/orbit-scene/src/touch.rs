use glam::Vec2;
use orbit_session::TouchEvent;

/// Current and previous pointer positions of the single touch stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchTracker {
    current: Option<Vec2>,
    last: Option<Vec2>,
}

impl TouchTracker {
    pub fn apply(&mut self, event: TouchEvent) {
        match event {
            TouchEvent::Down { x, y } => {
                let pos = Vec2::new(x, y);
                self.current = Some(pos);
                self.last = Some(pos);
            }
            TouchEvent::Move { x, y } => self.current = Some(Vec2::new(x, y)),
            TouchEvent::Up => {
                self.current = None;
                self.last = None;
            }
        }
    }

    pub fn is_touching(&self) -> bool {
        self.current.is_some()
    }

    /// Movement since the previous frame. Consumes it: a second call in the
    /// same frame returns zero.
    pub fn take_delta(&mut self) -> Option<Vec2> {
        let current = self.current?;
        let delta = self.last.map(|last| current - last);
        self.last = Some(current);
        delta
    }
}
