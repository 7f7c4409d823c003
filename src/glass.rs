//! Host-facing glass drop
//!
//! Wraps the pure `Simulation` with everything a host needs per frame:
//! model loading, the ground plane, and the draw pass. Nothing here returns
//! an error; failures are logged and the affected drawable is left out.

use glam::{Mat4, Vec3};

use crate::asset::AssetImporter;
use crate::mesh::{SourceMesh, Vertex, dust_quad, ground_plane};
use crate::render::{DrawCall, DrawKind, Renderer, dust_transform, object_transform};
use crate::settings::Settings;
use crate::sim::{DustEmitter, Fragment, PhaseKind, SimEvent, Simulation, tick};

const DUST_HALF_SIZE: f32 = 0.02;

pub struct GlassSimulation {
    sim: Simulation,
    settings: Settings,
    ground: SourceMesh,
    dust_quad: SourceMesh,
}

impl GlassSimulation {
    /// Load the model named in `settings` and start falling
    ///
    /// A model that fails to load leaves the object invisible; the drop
    /// still runs and shatters into nothing.
    pub fn new(settings: Settings, importer: &impl AssetImporter) -> Self {
        let meshes = load_meshes(&settings, importer);
        let sim = Simulation::new(meshes, settings.impact, settings.sim_params());
        Self::from_parts(sim, settings)
    }

    /// Like `new`, with a fixed RNG seed so jitter and launches replay exactly
    pub fn with_seed(settings: Settings, importer: &impl AssetImporter, seed: u64) -> Self {
        let meshes = load_meshes(&settings, importer);
        let sim = Simulation::with_seed(meshes, settings.impact, settings.sim_params(), seed);
        Self::from_parts(sim, settings)
    }

    fn from_parts(sim: Simulation, settings: Settings) -> Self {
        Self {
            ground: ground_plane(settings.ground_half_extent),
            dust_quad: dust_quad(DUST_HALF_SIZE),
            sim,
            settings,
        }
    }

    /// Advance by `dt` seconds; returns the transition this step caused, if any
    pub fn update(&mut self, dt: f32) -> Option<SimEvent> {
        tick(&mut self.sim, dt)
    }

    /// Back to an intact object at the current fall height
    pub fn reset(&mut self) {
        self.sim.reset();
        log::info!(
            "Reset: dropping from {:.2}m at {:.1} degrees",
            self.sim.impact.fall_height,
            self.sim.impact.impact_angle
        );
    }

    /// Issue this frame's draw calls
    ///
    /// Ground first, then the intact object or the fragments, then live dust.
    pub fn render(&self, renderer: &mut impl Renderer, view: Mat4, projection: Mat4) {
        let mut submit = |kind: DrawKind, vertices: &[Vertex], indices: &[u32], model: Mat4| {
            let call = DrawCall {
                kind,
                vertices,
                indices,
                model,
                view,
                projection,
            };
            if let Err(e) = renderer.draw(&call) {
                log::warn!("Failed to draw {:?}: {}", kind, e);
            }
        };

        submit(
            DrawKind::Ground,
            &self.ground.vertices,
            &self.ground.indices,
            Mat4::IDENTITY,
        );

        match self.sim.kind() {
            PhaseKind::Falling => {
                let model = object_transform(self.sim.object_position());
                for mesh in self.sim.meshes() {
                    submit(DrawKind::Object, &mesh.vertices, &mesh.indices, model);
                }
            }
            PhaseKind::Shattered | PhaseKind::Settled => {
                for fragment in self.sim.fragments() {
                    let mesh = fragment.mesh();
                    submit(
                        DrawKind::Fragment,
                        mesh.vertices(),
                        mesh.indices(),
                        fragment.model_matrix(),
                    );
                }
            }
        }

        let life = self.settings.dust.life;
        for particle in self.sim.dust().alive() {
            let fraction = if life > 0.0 { particle.life / life } else { 0.0 };
            submit(
                DrawKind::Dust,
                &self.dust_quad.vertices,
                &self.dust_quad.indices,
                dust_transform(particle.position, fraction),
            );
        }
    }

    pub fn fall_height(&self) -> f32 {
        self.sim.impact.fall_height
    }

    /// Takes effect on the next reset
    pub fn set_fall_height(&mut self, height: f32) {
        self.sim.impact.fall_height = height;
    }

    pub fn impact_angle(&self) -> f32 {
        self.sim.impact.impact_angle
    }

    /// Takes effect on the next reset
    pub fn set_impact_angle(&mut self, degrees: f32) {
        self.sim.impact.impact_angle = degrees;
    }

    pub fn phase(&self) -> PhaseKind {
        self.sim.kind()
    }

    pub fn simulation_time(&self) -> f32 {
        self.sim.simulation_time()
    }

    pub fn impact_time(&self) -> Option<f32> {
        self.sim.impact_time()
    }

    pub fn object_position(&self) -> Vec3 {
        self.sim.object_position()
    }

    pub fn object_velocity(&self) -> Vec3 {
        self.sim.object_velocity()
    }

    pub fn fragments(&self) -> &[Fragment] {
        self.sim.fragments()
    }

    pub fn dust(&self) -> &DustEmitter {
        self.sim.dust()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

fn load_meshes(settings: &Settings, importer: &impl AssetImporter) -> Vec<SourceMesh> {
    match importer.import(&settings.model_path) {
        Ok(meshes) => meshes,
        Err(e) if e.is_resource_load_failure() => {
            log::warn!("Failed to load model {}: {}", settings.model_path.display(), e);
            Vec::new()
        }
        Err(e) => {
            log::error!("Importer failed on {}: {}", settings.model_path.display(), e);
            Vec::new()
        }
    }
}
