//! Configuration loading and validation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            tracking: TrackingConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

/// Which spatial backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Synthetic hands and scene, no hardware required
    Simulated,
    /// Vendor spatial runtime; falls back to simulated if unavailable
    Device,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend selection
    #[serde(default = "default_mode")]
    pub mode: BackendMode,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
        }
    }
}

fn default_mode() -> BackendMode {
    BackendMode::Simulated
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Hand sampling cadence in milliseconds
    #[serde(default = "default_cadence")]
    pub cadence_ms: u64,
    /// Gesture sensitivity threshold (0.0 to 1.0)
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            cadence_ms: default_cadence(),
            sensitivity: default_sensitivity(),
        }
    }
}

fn default_cadence() -> u64 {
    16 // ~60 Hz
}

fn default_sensitivity() -> f64 {
    0.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Confidence a volume must exceed to count as a detected container
    #[serde(default = "default_container_threshold")]
    pub container_threshold: f64,
    /// Scene rescan interval in seconds (daemon mode)
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            container_threshold: default_container_threshold(),
            scan_interval_secs: default_scan_interval(),
        }
    }
}

fn default_container_threshold() -> f64 {
    0.7
}

fn default_scan_interval() -> u64 {
    10
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.mode, BackendMode::Simulated);
        assert_eq!(config.tracking.cadence_ms, 16);
        assert_eq!(config.tracking.sensitivity, 0.7);
        assert_eq!(config.scene.container_threshold, 0.7);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [backend]
            mode = "device"

            [tracking]
            sensitivity = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.mode, BackendMode::Device);
        assert_eq!(config.tracking.sensitivity, 0.5);
        assert_eq!(config.tracking.cadence_ms, 16);
        assert_eq!(config.scene.container_threshold, 0.7);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("packsense.toml")).unwrap();
        assert_eq!(config.backend.mode, BackendMode::Simulated);
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packsense.toml");
        let mut config = Config::default();
        config.tracking.cadence_ms = 33;
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.tracking.cadence_ms, 33);
    }
}
