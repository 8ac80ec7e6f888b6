//! The player-controlled avatar
//!
//! Gravity is applied once per simulated frame, not scaled by elapsed time,
//! so gameplay speed follows the display refresh.

use glam::Vec2;

use crate::consts::{MAX_TILT, TILT_PER_VELOCITY};
use crate::tuning::Tuning;

/// Screen edge touched during integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsContact {
    None,
    /// Hit the floor (terminal)
    Floor,
    /// Hit the ceiling (clamped, velocity zeroed)
    Ceiling,
}

#[derive(Debug, Clone)]
pub struct Avatar {
    /// x is fixed for the lifetime of the avatar
    pub pos: Vec2,
    pub radius: f32,
    /// Vertical velocity (px/frame, positive is down)
    pub velocity: f32,
    pub gravity: f32,
    pub impulse_velocity: f32,
    /// Idle bobbing baseline
    pub base_y: f32,
    /// Accumulated bob phase (radians)
    pub bob_phase: f32,
}

impl Avatar {
    /// Fresh avatar at the default baseline for a screen of the given size
    pub fn new(width: f32, height: f32, tuning: &Tuning) -> Self {
        let y = height / 2.0;
        Self {
            pos: Vec2::new(width * tuning.avatar_x_fraction, y),
            radius: tuning.avatar_radius,
            velocity: 0.0,
            gravity: tuning.gravity,
            impulse_velocity: tuning.impulse_velocity,
            base_y: y,
            bob_phase: 0.0,
        }
    }

    /// Advance one simulated frame and clamp against the screen edges
    pub fn integrate(&mut self, height: f32) -> BoundsContact {
        self.velocity += self.gravity;
        self.pos.y += self.velocity;

        if self.pos.y + self.radius >= height {
            self.pos.y = height - self.radius;
            return BoundsContact::Floor;
        }

        if self.pos.y - self.radius <= 0.0 {
            self.pos.y = self.radius;
            self.velocity = 0.0;
            return BoundsContact::Ceiling;
        }

        BoundsContact::None
    }

    /// Flap: overwrite velocity with the upward impulse regardless of current speed
    pub fn impulse(&mut self) {
        self.velocity = self.impulse_velocity;
    }

    /// Sinusoidal bobbing about the baseline, independent of physics
    pub fn idle_bob(&mut self, dt_ms: f32, rate: f32, amplitude: f32) {
        self.bob_phase += dt_ms * rate;
        self.pos.y = self.base_y + self.bob_phase.sin() * amplitude;
    }

    /// Re-centre on a resized screen (only while not playing)
    pub fn recenter(&mut self, width: f32, height: f32, x_fraction: f32) {
        self.pos.x = width * x_fraction;
        self.base_y = height / 2.0;
        self.pos.y = self.base_y;
    }

    /// Nose tilt derived from vertical velocity
    pub fn tilt(&self) -> f32 {
        (self.velocity * TILT_PER_VELOCITY).clamp(-MAX_TILT, MAX_TILT)
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn avatar() -> Avatar {
        Avatar::new(400.0, 600.0, &Tuning::default())
    }

    #[test]
    fn test_new_avatar_at_baseline() {
        let a = avatar();
        assert_eq!(a.pos, Vec2::new(80.0, 300.0));
        assert_eq!(a.velocity, 0.0);
        assert_eq!(a.base_y, 300.0);
    }

    #[test]
    fn test_gravity_is_per_frame() {
        let mut a = avatar();
        assert_eq!(a.integrate(600.0), BoundsContact::None);
        assert!((a.velocity - 0.25).abs() < 1e-6);
        assert!((a.pos.y - 300.25).abs() < 1e-6);

        a.integrate(600.0);
        assert!((a.velocity - 0.5).abs() < 1e-6);
        assert!((a.pos.y - 300.75).abs() < 1e-6);
    }

    #[test]
    fn test_impulse_overrides_velocity() {
        let mut a = avatar();
        a.velocity = 12.0;
        a.impulse();
        assert_eq!(a.velocity, -5.5);

        // Re-triggering while already rising resets to the same value
        a.velocity = -3.0;
        a.impulse();
        assert_eq!(a.velocity, -5.5);
    }

    #[test]
    fn test_floor_contact_clamps() {
        let mut a = avatar();
        a.pos.y = 575.0;
        a.velocity = 10.0;
        assert_eq!(a.integrate(600.0), BoundsContact::Floor);
        assert_eq!(a.pos.y, 580.0);
    }

    #[test]
    fn test_touching_floor_exactly_is_contact() {
        let mut a = avatar();
        a.pos.y = 570.0;
        a.velocity = 9.75;
        // 570 + 10 = 580, bottom edge exactly on the floor
        assert_eq!(a.integrate(600.0), BoundsContact::Floor);
        assert_eq!(a.pos.y, 580.0);

        let mut b = avatar();
        b.pos.y = 569.0;
        b.velocity = 9.75;
        assert_eq!(b.integrate(600.0), BoundsContact::None);
        assert_eq!(b.pos.y, 579.0);
    }

    #[test]
    fn test_ceiling_contact_zeroes_velocity() {
        let mut a = avatar();
        a.pos.y = 22.0;
        a.velocity = -5.5;
        assert_eq!(a.integrate(600.0), BoundsContact::Ceiling);
        assert_eq!(a.pos.y, 20.0);
        assert_eq!(a.velocity, 0.0);
    }

    #[test]
    fn test_idle_bob() {
        let mut a = avatar();
        // quarter period: sin(pi/2) = 1
        let dt = std::f32::consts::FRAC_PI_2 / 0.005;
        a.idle_bob(dt, 0.005, 10.0);
        assert!((a.pos.y - 310.0).abs() < 1e-3);
        assert_eq!(a.velocity, 0.0);
    }

    #[test]
    fn test_tilt_is_clamped() {
        let mut a = avatar();
        a.velocity = 100.0;
        assert_eq!(a.tilt(), MAX_TILT);
        a.velocity = -100.0;
        assert_eq!(a.tilt(), -MAX_TILT);
        a.velocity = 2.0;
        assert!((a.tilt() - 0.2).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_stays_on_screen(
            start in 20.0f32..580.0,
            velocity in -30.0f32..30.0,
            flaps in proptest::collection::vec(any::<bool>(), 1..200),
        ) {
            let mut a = avatar();
            a.pos.y = start;
            a.velocity = velocity;
            for flap in flaps {
                if flap {
                    a.impulse();
                }
                a.integrate(600.0);
                prop_assert!(a.pos.y >= a.radius && a.pos.y <= 600.0 - a.radius);
            }
        }
    }
}
