//! Glass shatter demo
//!
//! Headless driver: loads settings and the model, runs the drop on a fixed
//! timestep until the debris settles, and logs what a renderer would draw.
//!
//! Usage: `glass-shatter [settings.json] [--detail low|medium|high]`

use std::path::PathBuf;

use glam::{Mat4, Vec3};

use glass_shatter::asset::ObjImporter;
use glass_shatter::consts::{MAX_SUBSTEPS, SIM_DT};
use glass_shatter::render::{DrawKind, RecordingRenderer};
use glass_shatter::sim::{PhaseKind, SimEvent};
use glass_shatter::{DetailPreset, GlassSimulation, Settings};

/// Simulated display refresh; the accumulator runs two sim steps per frame
const FRAME_DT: f32 = 1.0 / 30.0;
/// Give up after this long even if something is still moving
const MAX_SECONDS: f32 = 60.0;

struct Demo {
    glass: GlassSimulation,
    renderer: RecordingRenderer,
    accumulator: f32,
    view: Mat4,
    projection: Mat4,
}

impl Demo {
    fn new(glass: GlassSimulation) -> Self {
        let eye = Vec3::new(6.0, 4.0, 8.0);
        Self {
            glass,
            renderer: RecordingRenderer::new(),
            accumulator: 0.0,
            view: Mat4::look_at_rh(eye, Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
            projection: Mat4::perspective_rh(45f32.to_radians(), 16.0 / 9.0, 0.1, 100.0),
        }
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) -> Vec<SimEvent> {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.glass.update(SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }

    fn render(&mut self) {
        self.renderer.clear();
        self.glass.render(&mut self.renderer, self.view, self.projection);
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Glass shatter (native) starting...");

    let mut settings_path = None;
    let mut detail = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--detail" {
            match args.next().as_deref().and_then(DetailPreset::from_str) {
                Some(preset) => detail = Some(preset),
                None => log::warn!("--detail expects low, medium or high"),
            }
        } else {
            settings_path = Some(PathBuf::from(arg));
        }
    }

    let mut settings = match settings_path {
        Some(path) => Settings::load_or_default(&path),
        None => Settings::default(),
    };
    if let Some(preset) = detail {
        settings.apply_preset(preset);
    }
    log::info!(
        "Detail {}, drop from {:.2}m at {:.1} degrees",
        settings.detail.as_str(),
        settings.impact.fall_height,
        settings.impact.impact_angle
    );

    let mut demo = Demo::new(GlassSimulation::new(settings, &ObjImporter));

    let mut frames = 0u32;
    while demo.glass.phase() != PhaseKind::Settled && demo.glass.simulation_time() < MAX_SECONDS {
        for event in demo.update(FRAME_DT) {
            match event {
                SimEvent::Shattered { fragments, .. } => println!("Shattered into {} fragments", fragments),
                SimEvent::Settled { time } => println!("Settled after {:.2}s", time),
            }
        }
        demo.render();
        frames += 1;
    }

    if demo.glass.phase() != PhaseKind::Settled {
        log::warn!("Debris still moving after {:.0}s", MAX_SECONDS);
    }
    println!(
        "{} frames, last frame: {} fragment draws, {} dust draws",
        frames,
        demo.renderer.count(DrawKind::Fragment),
        demo.renderer.count(DrawKind::Dust)
    );
}
