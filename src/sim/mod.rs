//! Fragmentation and fragment dynamics
//!
//! Pure simulation, no rendering or I/O:
//! - Caller-supplied timestep only
//! - RNG owned by the simulation (seedable for tests)
//! - Fragment collection owned by the current phase

pub mod dust;
pub mod dynamics;
pub mod fragment;
pub mod state;
pub mod subdivide;
pub mod tick;

pub use dust::{DustEmitter, DustParticle, DustSettings};
pub use dynamics::{PhysicsParams, below_ground, is_settled, resting_rebound, step, step_all};
pub use fragment::{Fragment, Launch, generate_fragments, sample_launch};
pub use state::{ImpactParameters, Phase, PhaseKind, SimEvent, SimParams, Simulation};
pub use subdivide::{Subdivision, subdivide};
pub use tick::tick;
