//! Simulation settings
//!
//! Plain JSON on disk. Every field has a default, so a settings file only
//! needs the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::SETTLE_SPEED;
use crate::error::ShatterError;
use crate::sim::{DustSettings, ImpactParameters, PhysicsParams, SimParams, Subdivision};

/// Fragment detail levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DetailPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl DetailPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailPreset::Low => "Low",
            DetailPreset::Medium => "Medium",
            DetailPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(DetailPreset::Low),
            "medium" | "med" => Some(DetailPreset::Medium),
            "high" => Some(DetailPreset::High),
            _ => None,
        }
    }

    /// Triangles at or below this area are not split further
    pub fn area_threshold(&self) -> f32 {
        match self {
            DetailPreset::Low => 0.05,
            DetailPreset::Medium => 0.01,
            DetailPreset::High => 0.0025,
        }
    }

    /// Maximum dust particles per burst
    pub fn max_dust(&self) -> usize {
        match self {
            DetailPreset::Low => 25,
            DetailPreset::Medium => 100,
            DetailPreset::High => 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub detail: DetailPreset,

    // === Drop ===
    pub impact: ImpactParameters,
    pub physics: PhysicsParams,

    // === Fragmentation ===
    pub subdivision: Subdivision,
    /// Debris counts as settled once every fragment is slower than this
    pub settle_speed: f32,
    pub dust: DustSettings,

    // === Scene ===
    pub model_path: PathBuf,
    /// Ground plane spans ±this on X and Z
    pub ground_half_extent: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            detail: DetailPreset::Medium,
            impact: ImpactParameters::default(),
            physics: PhysicsParams::default(),
            subdivision: Subdivision::default(),
            settle_speed: SETTLE_SPEED,
            dust: DustSettings::default(),
            model_path: PathBuf::from("assets/glass.obj"),
            ground_half_extent: 10.0,
        }
    }
}

impl Settings {
    /// Create settings from a detail preset (applies preset defaults)
    pub fn from_preset(preset: DetailPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a detail preset (updates detail-dependent settings)
    pub fn apply_preset(&mut self, preset: DetailPreset) {
        self.detail = preset;
        self.subdivision.area_threshold = preset.area_threshold();
        self.dust.count = self.dust.count.min(preset.max_dust());
    }

    /// The parts of the settings the simulation core reads
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            physics: self.physics,
            subdivision: self.subdivision,
            settle_speed: self.settle_speed,
            dust: self.dust,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ShatterError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ShatterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ShatterError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Like `load`, but falls back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }
}
