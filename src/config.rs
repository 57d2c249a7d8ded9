//! TOML-based application configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::error::Result as GridResult;
use crate::grid::cascade::CascadeSimulator;
use crate::grid::dataset;
use crate::grid::topology::GridTopology;
use crate::map::fallback::MapFallback;
use crate::map::tiles::TileLayer;

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults matching the `demo` preset. Load from TOML
/// with [`AppConfig::from_toml_file`] or use [`AppConfig::demo`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Grid dataset selection.
    #[serde(default)]
    pub grid: GridConfig,
    /// Cascade simulator parameters.
    #[serde(default)]
    pub cascade: CascadeConfig,
    /// Map loader parameters.
    #[serde(default)]
    pub map: MapConfig,
    /// Diagnostics pipeline parameters.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Server and LAN helper parameters.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Grid dataset selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Built-in dataset name or path to a JSON topology file.
    pub dataset: String,
    /// Region tag given to ingested nodes without one.
    pub region: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            dataset: "khordha".to_string(),
            region: "khordha".to_string(),
        }
    }
}

/// Cascade simulator parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CascadeConfig {
    /// How long a run blocks new triggers (ms).
    pub analysis_window_ms: u64,
    /// Propagation depth in hops (>= 1).
    pub depth: usize,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            analysis_window_ms: 5_000,
            depth: 1,
        }
    }
}

/// Map loader parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Load failures tolerated before the static map is shown (>= 1).
    pub max_retries: u32,
    /// First retry delay (ms); doubles per attempt.
    pub base_delay_ms: u64,
    /// Base layer: `"dark"`, `"satellite"` or `"terrain"`.
    pub tile_layer: String,
    /// Static map width (px).
    pub width: u32,
    /// Static map height (px).
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
            tile_layer: "dark".to_string(),
            width: 960,
            height: 640,
        }
    }
}

/// Diagnostics pipeline parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Verdict seed. Absent means a fresh seed per run.
    pub seed: Option<u64>,
    /// Duration of each progress phase (ms).
    pub phase_ms: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            seed: None,
            phase_ms: 1_200,
        }
    }
}

/// Server and LAN helper parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// HTTP port.
    pub port: u16,
    /// Env file updated by the network-ip command.
    pub env_file: PathBuf,
    /// Directory for the handoff channel.
    pub handoff_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            env_file: PathBuf::from(".env.local"),
            handoff_dir: PathBuf::from(".gridmind/handoff"),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field} — {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"cascade.depth"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl AppConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "field"];

    /// The default demo configuration.
    pub fn demo() -> Self {
        Self {
            grid: GridConfig::default(),
            cascade: CascadeConfig::default(),
            map: MapConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            server: ServerConfig::default(),
        }
    }

    /// Field-engineer preset: two-hop cascades, satellite tiles, patient map loader.
    pub fn field() -> Self {
        Self {
            cascade: CascadeConfig {
                depth: 2,
                ..CascadeConfig::default()
            },
            map: MapConfig {
                max_retries: 5,
                base_delay_ms: 500,
                tile_layer: "satellite".to_string(),
                ..MapConfig::default()
            },
            diagnostics: DiagnosticsConfig {
                seed: Some(42),
                phase_ms: 600,
            },
            ..Self::demo()
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "field" => Ok(Self::field()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.grid.dataset.trim().is_empty() {
            errors.push(ConfigError::new("grid.dataset", "must not be empty"));
        }
        if self.grid.region.trim().is_empty() {
            errors.push(ConfigError::new("grid.region", "must not be empty"));
        }

        if self.cascade.depth == 0 {
            errors.push(ConfigError::new("cascade.depth", "must be >= 1"));
        }

        let m = &self.map;
        if m.max_retries == 0 {
            errors.push(ConfigError::new("map.max_retries", "must be >= 1"));
        }
        if let Err(e) = TileLayer::from_str(&m.tile_layer) {
            errors.push(ConfigError::new("map.tile_layer", e));
        }
        if m.width == 0 || m.height == 0 {
            errors.push(ConfigError::new("map.width", "width and height must be > 0"));
        }

        if self.server.port == 0 {
            errors.push(ConfigError::new("server.port", "must be > 0"));
        }

        errors
    }

    /// Loads the configured topology (built-in name or JSON path).
    ///
    /// # Errors
    ///
    /// Returns an error if a dataset file cannot be read or parsed.
    pub fn load_topology(&self) -> GridResult<GridTopology> {
        match dataset::builtin(&self.grid.dataset) {
            Some(topo) => Ok(topo),
            None => GridTopology::from_json_file(Path::new(&self.grid.dataset)),
        }
    }

    /// Simulator built from `[cascade]`.
    pub fn cascade_simulator(&self) -> CascadeSimulator {
        CascadeSimulator::new(
            Duration::from_millis(self.cascade.analysis_window_ms),
            self.cascade.depth,
        )
    }

    /// Map loader built from `[map]`.
    pub fn map_fallback(&self) -> MapFallback {
        MapFallback::new(
            self.map.max_retries,
            Duration::from_millis(self.map.base_delay_ms),
        )
    }

    /// Parsed tile layer (dark when invalid; see [`AppConfig::validate`]).
    pub fn tile_layer(&self) -> TileLayer {
        self.map.tile_layer.parse().unwrap_or_default()
    }

    /// Phase duration for diagnostics runs.
    pub fn phase_duration(&self) -> Duration {
        Duration::from_millis(self.diagnostics.phase_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_preset_valid() {
        let cfg = AppConfig::demo();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "demo should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = AppConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in AppConfig::PRESETS {
            let cfg = AppConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[grid]
dataset = "khordha"
region = "puri"

[cascade]
analysis_window_ms = 2000
depth = 1

[map]
max_retries = 4
base_delay_ms = 250
tile_layer = "terrain"
width = 800
height = 600

[diagnostics]
seed = 9
phase_ms = 100

[server]
port = 8080
env_file = ".env"
handoff_dir = "/tmp/handoff"
"#;
        let cfg = AppConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.map.max_retries), Some(4));
        assert_eq!(cfg.as_ref().map(|c| c.tile_layer()), Some(TileLayer::Terrain));
        assert_eq!(cfg.as_ref().and_then(|c| c.diagnostics.seed), Some(9));
        assert_eq!(cfg.as_ref().map(|c| c.server.port), Some(8080));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[cascade]
depth = 1
transitive = true
"#;
        assert!(AppConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = AppConfig::from_toml_str("[map]\nmax_retries = 7\n");
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.map.max_retries), Some(7));
        assert_eq!(cfg.as_ref().map(|c| c.cascade.analysis_window_ms), Some(5_000));
        assert_eq!(cfg.as_ref().map(|c| c.grid.dataset.as_str()), Some("khordha"));
    }

    #[test]
    fn validation_catches_zero_depth_and_retries() {
        let mut cfg = AppConfig::demo();
        cfg.cascade.depth = 0;
        cfg.map.max_retries = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "cascade.depth"));
        assert!(errors.iter().any(|e| e.field == "map.max_retries"));
    }

    #[test]
    fn validation_catches_bad_tile_layer() {
        let mut cfg = AppConfig::demo();
        cfg.map.tile_layer = "street".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "map.tile_layer"));
        assert_eq!(cfg.tile_layer(), TileLayer::Dark);
    }

    #[test]
    fn field_preset_goes_two_hops() {
        let cfg = AppConfig::field();
        assert_eq!(cfg.cascade_simulator().depth(), 2);
        assert_eq!(cfg.map_fallback().max_retries(), 5);
    }

    #[test]
    fn builtin_dataset_loads() {
        let topo = AppConfig::demo().load_topology();
        assert!(topo.is_ok());
        assert!(topo.ok().and_then(|t| t.node("KHD-T-002").cloned()).is_some());
    }

    #[test]
    fn missing_dataset_file_errors() {
        let mut cfg = AppConfig::demo();
        cfg.grid.dataset = "/nonexistent/grid.json".to_string();
        assert!(cfg.load_topology().is_err());
    }
}
