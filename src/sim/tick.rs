//! Per-frame simulation advance
//!
//! One handler per phase. Transitions only move forward
//! (Falling -> Shattered -> Settled); going back takes `Simulation::reset`.

use glam::Vec3;

use super::dynamics::{is_settled, step_all};
use super::fragment::{Fragment, generate_fragments};
use super::state::{Phase, SimEvent, Simulation};
use crate::consts::GROUND_LEVEL;
use crate::free_fall_displacement;

/// Advance the simulation by `dt` seconds
///
/// Negative or non-finite `dt` is treated as zero.
pub fn tick(sim: &mut Simulation, dt: f32) -> Option<SimEvent> {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    let phase = std::mem::replace(&mut sim.phase, Phase::Settled { fragments: Vec::new() });
    let (next, event) = match phase {
        Phase::Falling { .. } => tick_falling(sim, dt),
        Phase::Shattered { fragments } => tick_shattered(sim, fragments, dt),
        Phase::Settled { fragments } => tick_settled(sim, fragments, dt),
    };
    sim.phase = next;
    event
}

/// Closed-form free fall from rest; shatter on reaching the ground
fn tick_falling(sim: &mut Simulation, dt: f32) -> (Phase, Option<SimEvent>) {
    sim.time += dt;

    let gravity = sim.params.physics.gravity;
    let y = sim.active.fall_height - free_fall_displacement(gravity, sim.time);
    let velocity = Vec3::new(0.0, -gravity * sim.time, 0.0);

    if y > GROUND_LEVEL {
        let position = Vec3::new(0.0, y, 0.0);
        return (Phase::Falling { position, velocity }, None);
    }

    let impact = Vec3::new(0.0, GROUND_LEVEL, 0.0);
    let angle = sim.active.impact_angle;
    let fragments = generate_fragments(&sim.meshes, &sim.params.subdivision, impact, angle, &mut sim.rng);
    sim.dust.burst(impact, angle, &sim.params.dust, &mut sim.rng);
    sim.impact_time = Some(sim.time);

    log::info!(
        "Glass shattered into {} fragments at t={:.3}s (impact speed {:.2} m/s)",
        fragments.len(),
        sim.time,
        velocity.length()
    );
    let event = SimEvent::Shattered {
        fragments: fragments.len(),
        position: impact,
    };
    (Phase::Shattered { fragments }, Some(event))
}

/// Integrate every fragment, then check whether the debris has come to rest
fn tick_shattered(sim: &mut Simulation, mut fragments: Vec<Fragment>, dt: f32) -> (Phase, Option<SimEvent>) {
    sim.time += dt;

    step_all(&mut fragments, dt, &sim.params.physics);
    sim.dust.update(dt, sim.params.physics.gravity);

    if is_settled(&fragments, sim.params.settle_speed) {
        log::info!(
            "{} fragments settled at t={:.3}s",
            fragments.len(),
            sim.time
        );
        let event = SimEvent::Settled { time: sim.time };
        return (Phase::Settled { fragments }, Some(event));
    }
    (Phase::Shattered { fragments }, None)
}

/// Fragments stay where they came to rest; the clock and leftover dust keep going
fn tick_settled(sim: &mut Simulation, fragments: Vec<Fragment>, dt: f32) -> (Phase, Option<SimEvent>) {
    sim.time += dt;
    sim.dust.update(dt, sim.params.physics.gravity);
    (Phase::Settled { fragments }, None)
}
