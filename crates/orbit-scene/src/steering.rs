use orbit_session::MotionSample;

/// Tilt below this magnitude on the x axis is ignored.
pub const TILT_DEAD_ZONE: f32 = 0.2;

/// Azimuth step per frame while steering, in drag pixels.
pub const STEER_STEP: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steer {
    Left,
    Right,
    #[default]
    Neutral,
}

impl Steer {
    /// Gravity x goes negative when the device tips to the right.
    pub fn from_motion(sample: MotionSample) -> Self {
        if sample.x < -TILT_DEAD_ZONE {
            Self::Right
        } else if sample.x > TILT_DEAD_ZONE {
            Self::Left
        } else {
            Self::Neutral
        }
    }

    /// Azimuth change for one frame, matching the direction of a drag.
    pub fn azimuth_step(self, strength: f32) -> f32 {
        match self {
            Self::Left => STEER_STEP * strength,
            Self::Right => -STEER_STEP * strength,
            Self::Neutral => 0.0,
        }
    }
}
