use std::path::{Path, PathBuf};

use lumen_core::GraphConfig;
use serde::Deserialize;

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

/// Server configuration, read from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// GeoJSON FeatureCollection of road segments.
    pub segments_path: PathBuf,
    /// CSV of `longitude,latitude,score` samples.
    pub samples_path: PathBuf,
    #[serde(default)]
    pub graph: GraphConfig,
    /// Default snap radius in meters for queries that don't set their
    /// own; `0` means unbounded.
    #[serde(default)]
    pub max_solution_radius: f64,
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
