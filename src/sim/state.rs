//! Simulation state
//!
//! The lifecycle is a tagged union: the fragment collection only exists in
//! the phases that have one, so an intact falling object can't carry stale
//! shards by construction.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::dust::{DustEmitter, DustSettings};
use super::dynamics::PhysicsParams;
use super::fragment::Fragment;
use super::subdivide::Subdivision;
use crate::consts::{DEFAULT_FALL_HEIGHT, DEFAULT_IMPACT_ANGLE, SETTLE_SPEED};
use crate::mesh::SourceMesh;

/// User-adjustable drop parameters, read on reset and at impact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactParameters {
    /// Initial drop height
    pub fall_height: f32,
    /// Biases fragment launch direction (degrees from +X toward +Y)
    pub impact_angle: f32,
}

impl Default for ImpactParameters {
    fn default() -> Self {
        Self {
            fall_height: DEFAULT_FALL_HEIGHT,
            impact_angle: DEFAULT_IMPACT_ANGLE,
        }
    }
}

/// Everything the simulation reads but never writes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    pub physics: PhysicsParams,
    pub subdivision: Subdivision,
    pub settle_speed: f32,
    pub dust: DustSettings,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            physics: PhysicsParams::default(),
            subdivision: Subdivision::default(),
            settle_speed: SETTLE_SPEED,
            dust: DustSettings::default(),
        }
    }
}

/// Current lifecycle phase
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Intact object in free fall from rest
    Falling { position: Vec3, velocity: Vec3 },
    /// Fragments in flight
    Shattered { fragments: Vec<Fragment> },
    /// Every fragment at rest; terminal until reset
    Settled { fragments: Vec<Fragment> },
}

impl Phase {
    pub fn falling_from(height: f32) -> Self {
        Phase::Falling {
            position: Vec3::new(0.0, height, 0.0),
            velocity: Vec3::ZERO,
        }
    }

    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Falling { .. } => PhaseKind::Falling,
            Phase::Shattered { .. } => PhaseKind::Shattered,
            Phase::Settled { .. } => PhaseKind::Settled,
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        match self {
            Phase::Falling { .. } => &[],
            Phase::Shattered { fragments } | Phase::Settled { fragments } => fragments,
        }
    }
}

/// Payload-free phase tag, ordered by lifecycle progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    Falling,
    Shattered,
    Settled,
}

/// Transition notifications returned from a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// The object hit the ground and broke into this many fragments
    Shattered { fragments: usize, position: Vec3 },
    /// Every fragment came to rest `time` seconds after the drop
    Settled { time: f32 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Editable drop parameters; applied on the next reset
    pub impact: ImpactParameters,
    pub params: SimParams,
    /// Parameters of the drop in progress, snapshotted at reset
    pub(super) active: ImpactParameters,
    /// Seconds since (re)start
    pub(super) time: f32,
    pub(super) impact_time: Option<f32>,
    pub(super) phase: Phase,
    pub(super) meshes: Vec<SourceMesh>,
    pub(super) dust: DustEmitter,
    pub(super) rng: Pcg32,
}

impl Simulation {
    /// New simulation with an entropy-seeded RNG
    pub fn new(meshes: Vec<SourceMesh>, impact: ImpactParameters, params: SimParams) -> Self {
        Self::with_rng(meshes, impact, params, Pcg32::from_rng(&mut rand::rng()))
    }

    /// New simulation whose jitter and launches replay exactly for a given seed
    pub fn with_seed(meshes: Vec<SourceMesh>, impact: ImpactParameters, params: SimParams, seed: u64) -> Self {
        Self::with_rng(meshes, impact, params, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(meshes: Vec<SourceMesh>, impact: ImpactParameters, params: SimParams, rng: Pcg32) -> Self {
        Self {
            impact,
            params,
            active: impact,
            time: 0.0,
            impact_time: None,
            phase: Phase::falling_from(impact.fall_height),
            meshes,
            dust: DustEmitter::new(),
            rng,
        }
    }

    /// Back to an intact object at the current fall height, no fragments, clock at zero
    pub fn reset(&mut self) {
        self.active = self.impact;
        self.time = 0.0;
        self.impact_time = None;
        self.phase = Phase::falling_from(self.impact.fall_height);
        self.dust.reset();
    }

    /// Parameters the current drop is using
    pub fn active_impact(&self) -> &ImpactParameters {
        &self.active
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn simulation_time(&self) -> f32 {
        self.time
    }

    /// Simulation time at which the object hit the ground
    pub fn impact_time(&self) -> Option<f32> {
        self.impact_time
    }

    /// Intact object's position (meaningful while falling; ground point afterwards)
    pub fn object_position(&self) -> Vec3 {
        match &self.phase {
            Phase::Falling { position, .. } => *position,
            _ => Vec3::ZERO,
        }
    }

    pub fn object_velocity(&self) -> Vec3 {
        match &self.phase {
            Phase::Falling { velocity, .. } => *velocity,
            _ => Vec3::ZERO,
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        self.phase.fragments()
    }

    pub fn meshes(&self) -> &[SourceMesh] {
        &self.meshes
    }

    pub fn dust(&self) -> &DustEmitter {
        &self.dust
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_simulation_is_falling() {
        let sim = Simulation::with_seed(Vec::new(), ImpactParameters::default(), SimParams::default(), 1);
        assert_eq!(sim.kind(), PhaseKind::Falling);
        assert_eq!(sim.object_position(), Vec3::new(0.0, DEFAULT_FALL_HEIGHT, 0.0));
        assert!(sim.fragments().is_empty());
        assert_eq!(sim.simulation_time(), 0.0);
        assert_eq!(sim.impact_time(), None);
    }

    #[test]
    fn test_reset_applies_edited_height() {
        let mut sim = Simulation::with_seed(Vec::new(), ImpactParameters::default(), SimParams::default(), 1);
        sim.impact.fall_height = 3.0;
        sim.impact.impact_angle = 10.0;
        // Not applied until reset
        assert_eq!(sim.object_position().y, DEFAULT_FALL_HEIGHT);
        assert_eq!(sim.active_impact().impact_angle, DEFAULT_IMPACT_ANGLE);
        sim.reset();
        assert_eq!(sim.object_position().y, 3.0);
        assert_eq!(sim.active_impact().impact_angle, 10.0);
    }

    #[test]
    fn test_phase_kind_order() {
        assert!(PhaseKind::Falling < PhaseKind::Shattered);
        assert!(PhaseKind::Shattered < PhaseKind::Settled);
    }
}
