//! Dust burst spawned at the moment of impact
//!
//! Purely visual and independent of the fragments: particles live on a
//! timer, fall under gravity, never collide, and play no part in settling.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fragment::sample_launch;

/// Dust configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DustSettings {
    pub enabled: bool,
    /// Particles per burst
    pub count: usize,
    /// Seconds each particle lives
    pub life: f32,
}

impl Default for DustSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 100,
            life: 3.0,
        }
    }
}

/// A single dust mote
#[derive(Debug, Clone, PartialEq)]
pub struct DustParticle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds remaining; dead at or below zero
    pub life: f32,
}

impl DustParticle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct DustEmitter {
    particles: Vec<DustParticle>,
}

impl DustEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous burst with a fresh one at `origin`
    pub fn burst<R: Rng>(&mut self, origin: Vec3, impact_angle: f32, settings: &DustSettings, rng: &mut R) {
        self.particles.clear();
        if !settings.enabled {
            return;
        }
        self.particles.extend((0..settings.count).map(|_| DustParticle {
            position: origin,
            velocity: sample_launch(impact_angle, rng).velocity,
            life: settings.life,
        }));
    }

    pub fn update(&mut self, dt: f32, gravity: f32) {
        for p in self.particles.iter_mut().filter(|p| p.is_alive()) {
            p.life -= dt;
            p.velocity.y -= gravity * dt;
            p.position += p.velocity * dt;
        }
    }

    pub fn particles(&self) -> &[DustParticle] {
        &self.particles
    }

    pub fn alive(&self) -> impl Iterator<Item = &DustParticle> {
        self.particles.iter().filter(|p| p.is_alive())
    }

    /// True once every particle's timer has run out (or nothing was emitted)
    pub fn is_finished(&self) -> bool {
        self.alive().next().is_none()
    }

    pub fn reset(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRAVITY;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_and_expire() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut dust = DustEmitter::new();
        let settings = DustSettings {
            enabled: true,
            count: 20,
            life: 0.5,
        };
        dust.burst(Vec3::ZERO, 45.0, &settings, &mut rng);
        assert_eq!(dust.particles().len(), 20);
        assert!(!dust.is_finished());

        for _ in 0..4 {
            dust.update(0.1, GRAVITY);
        }
        assert!(!dust.is_finished());
        dust.update(0.1, GRAVITY);
        dust.update(0.1, GRAVITY);
        assert!(dust.is_finished());
    }

    #[test]
    fn test_dead_particles_freeze() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut dust = DustEmitter::new();
        let settings = DustSettings {
            enabled: true,
            count: 1,
            life: 0.05,
        };
        dust.burst(Vec3::ZERO, 45.0, &settings, &mut rng);
        dust.update(0.1, GRAVITY);
        let frozen = dust.particles()[0].clone();
        dust.update(0.1, GRAVITY);
        assert_eq!(dust.particles()[0], frozen);
    }

    #[test]
    fn test_disabled_and_reset() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut dust = DustEmitter::new();
        let disabled = DustSettings {
            enabled: false,
            ..Default::default()
        };
        dust.burst(Vec3::ZERO, 45.0, &disabled, &mut rng);
        assert!(dust.is_finished());

        dust.burst(Vec3::ZERO, 45.0, &DustSettings::default(), &mut rng);
        assert_eq!(dust.particles().len(), 100);
        dust.reset();
        assert!(dust.particles().is_empty());
    }
}
