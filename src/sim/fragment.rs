//! Fragments and the fragment generator
//!
//! Shattering turns every source triangle into area-bounded shards and
//! launches each one from the impact point with its own random velocity
//! and spin.

use glam::{Mat4, Vec3};
use rand::Rng;

use super::subdivide::Subdivision;
use crate::consts::{LAUNCH_ANGLE_SPREAD, MAX_ANGULAR_VELOCITY, MAX_LATERAL_SPEED, MAX_LAUNCH_SPEED};
use crate::launch_direction;
use crate::mesh::{FragmentMesh, SourceMesh, Triangle};

/// One independently simulated shard
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Unit length at creation, never renormalized
    pub rotation_axis: Vec3,
    /// Accumulated rotation (degrees, unbounded)
    pub rotation_angle: f32,
    /// Spin rate (degrees/s); only friction changes it
    pub angular_velocity: f32,
    mesh: FragmentMesh,
}

impl Fragment {
    pub fn new(mesh: FragmentMesh, position: Vec3, velocity: Vec3, rotation_axis: Vec3, angular_velocity: f32) -> Self {
        Self {
            position,
            velocity,
            rotation_axis,
            rotation_angle: 0.0,
            angular_velocity,
            mesh,
        }
    }

    pub fn mesh(&self) -> &FragmentMesh {
        &self.mesh
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Translation followed by the accumulated axis-angle spin
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_axis_angle(self.rotation_axis, self.rotation_angle.to_radians())
    }
}

/// Initial kinematic state of one shard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub velocity: Vec3,
    pub rotation_axis: Vec3,
    pub angular_velocity: f32,
}

/// Sample a launch around `impact_angle` (degrees)
///
/// The XY velocity follows the impact angle with a small spread; Z speed is
/// drawn independently. The rotation axis is normalized from three [0, 1)
/// draws, so it leans toward the positive octant.
pub fn sample_launch<R: Rng>(impact_angle: f32, rng: &mut R) -> Launch {
    let speed = rng.random_range(0.0..MAX_LAUNCH_SPEED);
    let angle = impact_angle + rng.random_range(-LAUNCH_ANGLE_SPREAD..LAUNCH_ANGLE_SPREAD);
    let planar = launch_direction(angle) * speed;
    let lateral = rng.random_range(0.0..MAX_LATERAL_SPEED);

    let raw_axis = Vec3::new(rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>());
    let rotation_axis = raw_axis.try_normalize().unwrap_or(Vec3::Y);

    Launch {
        velocity: Vec3::new(planar.x, planar.y, lateral),
        rotation_axis,
        angular_velocity: rng.random_range(0.0..MAX_ANGULAR_VELOCITY),
    }
}

/// Shatter `meshes` into fragments co-located at `impact_position`
///
/// Index triples pointing outside their mesh's vertex list are skipped.
pub fn generate_fragments<R: Rng>(
    meshes: &[SourceMesh],
    subdivision: &Subdivision,
    impact_position: Vec3,
    impact_angle: f32,
    rng: &mut R,
) -> Vec<Fragment> {
    let mut shards: Vec<Triangle> = Vec::new();
    for (mesh_idx, mesh) in meshes.iter().enumerate() {
        let before = shards.len();
        for tri in mesh.triangles() {
            match tri {
                Ok(tri) => subdivision.split_into(&tri, rng, &mut shards),
                Err(tri_idx) => {
                    log::warn!("Mesh {} triangle {} has out-of-range indices, skipped", mesh_idx, tri_idx);
                }
            }
        }
        log::debug!(
            "Mesh {} ({} triangles) -> {} shards",
            mesh_idx,
            mesh.triangle_count(),
            shards.len() - before
        );
    }

    shards
        .into_iter()
        .map(|tri| {
            let launch = sample_launch(impact_angle, rng);
            Fragment::new(
                FragmentMesh::from(tri),
                impact_position,
                launch.velocity,
                launch.rotation_axis,
                launch.angular_velocity,
            )
        })
        .collect()
}
