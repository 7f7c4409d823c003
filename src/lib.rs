//! Glass Shatter - a falling object that breaks into a debris field
//!
//! Core modules:
//! - `sim`: Fragmentation and fragment dynamics (subdivision, launch, bounce, settle)
//! - `mesh`: Vertex and triangle value types shared with the host renderer
//! - `asset`: Model import collaborator (Wavefront OBJ)
//! - `render`: Renderer collaborator interface and model transforms
//! - `glass`: Host-facing `GlassSimulation` (update / render / reset)
//! - `settings`: Data-driven tuning

pub mod asset;
pub mod error;
pub mod glass;
pub mod mesh;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::ShatterError;
pub use glass::GlassSimulation;
pub use settings::{DetailPreset, Settings};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Height of the ground plane
    pub const GROUND_LEVEL: f32 = 0.0;

    /// Default drop height
    pub const DEFAULT_FALL_HEIGHT: f32 = 10.0;
    /// Default impact angle (degrees)
    pub const DEFAULT_IMPACT_ANGLE: f32 = 45.0;

    /// Vertical velocity retained on a bounce
    pub const DEFAULT_RESTITUTION: f32 = 0.5;
    /// Horizontal velocity and spin retained on a bounce
    pub const DEFAULT_FRICTION: f32 = 0.8;

    /// Every fragment at or below this speed means the debris has settled
    pub const SETTLE_SPEED: f32 = 0.05;

    /// Per-axis positional jitter applied to subdivided vertices
    pub const JITTER_AMPLITUDE: f32 = 0.005;
    /// Hard recursion floor for subdivision (4^8 = 65536 shards per source triangle)
    pub const MAX_SUBDIVISION_DEPTH: u32 = 8;
    /// Triangles smaller than this are never split, whatever the threshold
    pub const MIN_TRIANGLE_AREA: f32 = 1e-8;

    /// Fragment launch speed range (m/s)
    pub const MAX_LAUNCH_SPEED: f32 = 5.0;
    /// Launch angle spread around the impact angle (degrees, ±)
    pub const LAUNCH_ANGLE_SPREAD: f32 = 2.5;
    /// Lateral (Z) launch speed range (m/s)
    pub const MAX_LATERAL_SPEED: f32 = 5.0;
    /// Spin rate range (degrees/s)
    pub const MAX_ANGULAR_VELOCITY: f32 = 90.0;

    /// Fixed timestep used by the demo driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Unit direction in the XY plane for an angle in degrees, measured from +X toward +Y
#[inline]
pub fn launch_direction(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Free-fall displacement from rest after `t` seconds
#[inline]
pub fn free_fall_displacement(gravity: f32, t: f32) -> f32 {
    0.5 * gravity * t * t
}
