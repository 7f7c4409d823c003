//! Fragment dynamics
//!
//! Fragments are point masses with a free spin. Each tick: gravity on the
//! vertical axis, position update, spin update, then a position-based ground
//! contact that bounces with restitution and damps the rest with friction.
//!
//! A shard lying on the plane picks up `g·dt` of downward speed every tick and
//! so rebounds at most `r·g·dt`. Rebounds that small are resting contact and
//! zeroed; otherwise it keeps hopping at `g·dt·r/(1+r)` and at 60 Hz never
//! drops under the settle speed. Faster rebounds are real bounces and kept.

use serde::{Deserialize, Serialize};

use super::fragment::Fragment;
use crate::consts::{DEFAULT_FRICTION, DEFAULT_RESTITUTION, GRAVITY, GROUND_LEVEL};

/// Physical coefficients shared by every fragment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    pub gravity: f32,
    /// Fraction of vertical speed kept on a bounce
    pub restitution: f32,
    /// Fraction of horizontal speed and spin kept on a bounce
    pub friction: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            restitution: DEFAULT_RESTITUTION,
            friction: DEFAULT_FRICTION,
        }
    }
}

/// Relative slack on the resting-contact rebound (covers rounding of `r·g·dt`)
const RESTING_SLACK: f32 = 1e-4;

/// True once a point has passed through the ground plane
#[inline]
pub fn below_ground(y: f32) -> bool {
    y < GROUND_LEVEL
}

/// Largest rebound produced by a shard that was already at rest on the plane
#[inline]
pub fn resting_rebound(dt: f32, params: &PhysicsParams) -> f32 {
    params.restitution * params.gravity * dt * (1.0 + RESTING_SLACK)
}

/// Advance one fragment by `dt`
pub fn step(fragment: &mut Fragment, dt: f32, params: &PhysicsParams) {
    // Semi-implicit Euler, gravity on Y only
    fragment.velocity.y -= params.gravity * dt;
    fragment.position += fragment.velocity * dt;
    fragment.rotation_angle += fragment.angular_velocity * dt;

    // Resolved after the fact: fast shards may dip below the plane for a frame
    if below_ground(fragment.position.y) {
        fragment.position.y = GROUND_LEVEL;
        let rebound = -fragment.velocity.y * params.restitution;
        fragment.velocity.y = if rebound <= resting_rebound(dt, params) { 0.0 } else { rebound };
        fragment.velocity.x *= params.friction;
        fragment.velocity.z *= params.friction;
        fragment.angular_velocity *= params.friction;
    }
}

/// Advance every fragment by `dt`
pub fn step_all(fragments: &mut [Fragment], dt: f32, params: &PhysicsParams) {
    for fragment in fragments.iter_mut() {
        step(fragment, dt, params);
    }
}

/// True when no fragment moves faster than `settle_speed`
pub fn is_settled(fragments: &[Fragment], settle_speed: f32) -> bool {
    fragments.iter().all(|f| f.speed() <= settle_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SETTLE_SPEED;
    use crate::mesh::{FragmentMesh, Triangle, Vertex};
    use glam::Vec3;

    fn fragment(position: Vec3, velocity: Vec3, angular_velocity: f32) -> Fragment {
        let v = Vertex::new(Vec3::ZERO, Vec3::Y);
        let mesh = FragmentMesh::from(Triangle::new(v, v, v));
        Fragment::new(mesh, position, velocity, Vec3::Y, angular_velocity)
    }

    #[test]
    fn test_free_flight_step() {
        let params = PhysicsParams::default();
        let mut f = fragment(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 2.0), 30.0);
        step(&mut f, 0.1, &params);

        assert!((f.velocity.y + GRAVITY * 0.1).abs() < 1e-6);
        // Position uses the already-updated velocity
        assert!((f.position.y - (5.0 - GRAVITY * 0.01)).abs() < 1e-5);
        assert!((f.position.x - 0.1).abs() < 1e-6);
        assert!((f.position.z - 0.2).abs() < 1e-6);
        assert!((f.rotation_angle - 3.0).abs() < 1e-5);
        assert_eq!(f.angular_velocity, 30.0);
    }

    #[test]
    fn test_ground_bounce() {
        let params = PhysicsParams {
            gravity: 0.0,
            restitution: 0.5,
            friction: 0.8,
        };
        let mut f = fragment(Vec3::new(0.0, 0.05, 0.0), Vec3::new(2.0, -1.0, 1.0), 50.0);
        step(&mut f, 0.1, &params);

        assert_eq!(f.position.y, GROUND_LEVEL);
        assert!((f.velocity.y - 0.5).abs() < 1e-6);
        assert!((f.velocity.x - 1.6).abs() < 1e-6);
        assert!((f.velocity.z - 0.8).abs() < 1e-6);
        assert!((f.angular_velocity - 40.0).abs() < 1e-5);
    }

    #[test]
    fn test_resting_contact_zeroes_tiny_rebound() {
        let params = PhysicsParams::default();
        let dt = 1.0 / 60.0;
        let mut f = fragment(Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), 0.0);
        for _ in 0..5 {
            step(&mut f, dt, &params);
            assert_eq!(f.position.y, GROUND_LEVEL);
            assert_eq!(f.velocity.y, 0.0);
        }
        assert!((f.velocity.x - 0.5 * 0.8f32.powi(5)).abs() < 1e-6);
    }

    #[test]
    fn test_resting_on_ground_is_not_a_contact() {
        assert!(!below_ground(0.0));
        assert!(below_ground(-0.25));
    }

    #[test]
    fn test_slow_bounce_survives_large_dt() {
        let params = PhysicsParams::default();
        let mut f = fragment(Vec3::new(0.0, 0.05, 0.0), Vec3::new(0.0, -0.9, 0.0), 0.0);
        step(&mut f, 0.1, &params);

        // Hit at -(0.9 + g·dt), well above anything a resting shard produces
        let expected = (0.9 + GRAVITY * 0.1) * params.restitution;
        assert_eq!(f.position.y, GROUND_LEVEL);
        assert!((f.velocity.y - expected).abs() < 1e-5, "vy = {}", f.velocity.y);
        assert!(f.velocity.y > resting_rebound(0.1, &params));
    }

    #[test]
    fn test_resting_contact_at_large_dt() {
        let params = PhysicsParams::default();
        let mut f = fragment(Vec3::ZERO, Vec3::ZERO, 0.0);
        for _ in 0..5 {
            step(&mut f, 0.1, &params);
            assert_eq!(f.velocity.y, 0.0);
            assert_eq!(f.position.y, GROUND_LEVEL);
        }
    }

    #[test]
    fn test_bouncing_fragment_settles() {
        let params = PhysicsParams::default();
        let mut f = fragment(Vec3::ZERO, Vec3::new(3.0, 4.0, 2.0), 90.0);
        let dt = 1.0 / 60.0;

        let mut last_bounce_speed = f32::INFINITY;
        let mut bounces = 0;
        let mut ticks = 0;
        while !is_settled(std::slice::from_ref(&f), SETTLE_SPEED) {
            let was_falling = f.velocity.y < 0.0;
            step(&mut f, dt, &params);
            if was_falling && f.velocity.y >= 0.0 && f.position.y == GROUND_LEVEL {
                let speed = f.speed();
                assert!(speed < last_bounce_speed);
                last_bounce_speed = speed;
                bounces += 1;
            }
            ticks += 1;
            assert!(ticks < 10_000, "fragment never settled");
        }
        assert!(bounces > 0);
        assert_eq!(f.position.y, GROUND_LEVEL);
    }

    #[test]
    fn test_settle_threshold_is_inclusive() {
        let still = fragment(Vec3::ZERO, Vec3::new(SETTLE_SPEED, 0.0, 0.0), 0.0);
        let moving = fragment(Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0), 0.0);
        assert!(is_settled(&[still.clone()], SETTLE_SPEED));
        assert!(!is_settled(&[still, moving], SETTLE_SPEED));
        assert!(is_settled(&[], SETTLE_SPEED));
    }
}
