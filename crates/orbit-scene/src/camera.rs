use glam::{Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Elevation stays this far from the poles so `look_at` never flips.
const POLE_MARGIN: f32 = 0.01;

/// Positions closer than this to the target cannot define an orbit.
pub const MIN_RADIUS: f32 = 1e-3;

/// Starting eye position when the scene names none.
pub const DEFAULT_EYE: Vec3 = Vec3::new(-2.5, 4.5, 9.0);

/// Camera on a sphere around `target`, steered in spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal angle, radians.
    pub azimuth: f32,
    /// Vertical angle, radians.
    pub elevation: f32,
    pub radius: f32,
    pub target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_position(DEFAULT_EYE).unwrap_or(Self {
            azimuth: 0.0,
            elevation: 0.0,
            radius: 10.0,
            target: Vec3::ZERO,
        })
    }
}

impl OrbitCamera {
    /// Orbit around the origin passing through `eye`. `None` when `eye` is
    /// too close to the origin or not finite.
    pub fn from_position(eye: Vec3) -> Option<Self> {
        let radius = eye.length();
        if !radius.is_finite() || radius < MIN_RADIUS {
            return None;
        }
        let elevation = (eye.y / radius)
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(-FRAC_PI_2 + POLE_MARGIN, FRAC_PI_2 - POLE_MARGIN);
        Some(Self {
            azimuth: eye.x.atan2(eye.z),
            elevation,
            radius,
            target: Vec3::ZERO,
        })
    }

    /// Rotate by a drag of `delta` pixels.
    pub fn drag(&mut self, delta: Vec2, strength: f32) {
        self.azimuth -= delta.x * strength;
        self.elevation = (self.elevation + delta.y * strength)
            .clamp(-FRAC_PI_2 + POLE_MARGIN, FRAC_PI_2 - POLE_MARGIN);
    }

    pub fn rotate_azimuth(&mut self, radians: f32) {
        self.azimuth += radians;
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target
            + Vec3::new(
                self.radius * cos_el * sin_az,
                self.radius * sin_el,
                self.radius * cos_el * cos_az,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn position_round_trips_through_spherical() {
        let eye = Vec3::new(3.0, 4.0, 5.0);
        let cam = OrbitCamera::from_position(eye).unwrap();
        assert!(close(cam.eye(), eye));
    }

    #[test]
    fn origin_is_not_an_orbit() {
        assert!(OrbitCamera::from_position(Vec3::ZERO).is_none());
        assert!(OrbitCamera::from_position(Vec3::splat(f32::NAN)).is_none());
    }

    #[test]
    fn default_matches_starting_eye() {
        assert!(close(OrbitCamera::default().eye(), DEFAULT_EYE));
    }

    #[test]
    fn drag_right_decreases_azimuth() {
        let mut cam = OrbitCamera::from_position(Vec3::new(0.0, 0.0, 10.0)).unwrap();
        cam.drag(Vec2::new(10.0, 0.0), 0.01);
        assert!((cam.azimuth + 0.1).abs() < 1e-6);
        assert_eq!(cam.radius, 10.0);
    }

    #[test]
    fn elevation_is_clamped_short_of_the_pole() {
        let mut cam = OrbitCamera::from_position(Vec3::new(0.0, 0.0, 10.0)).unwrap();
        cam.drag(Vec2::new(0.0, 10_000.0), 0.01);
        assert!(cam.elevation < FRAC_PI_2);
        assert!((cam.elevation - (FRAC_PI_2 - POLE_MARGIN)).abs() < 1e-6);
        cam.drag(Vec2::new(0.0, -20_000.0), 0.01);
        assert!((cam.elevation + (FRAC_PI_2 - POLE_MARGIN)).abs() < 1e-6);
    }
}
