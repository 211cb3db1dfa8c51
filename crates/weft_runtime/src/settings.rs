//! Simulation settings

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Headless driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Entities spawned at startup.
    pub entity_count: u32,
    /// Fixed ticks to simulate before exiting.
    pub tick_count: u32,
    /// Constant downward acceleration applied per tick.
    pub gravity: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            entity_count: 16,
            tick_count: 120,
            gravity: -9.81,
        }
    }
}

impl SimulationSettings {
    /// Load settings from a JSON file, falling back to defaults when the
    /// file is missing.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
