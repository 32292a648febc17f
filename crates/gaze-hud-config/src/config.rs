//! Configuration sections and loading

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Eye-tracker calibration procedure requested from the headset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationMode {
    /// Full multi-point calibration
    Legacy,
    /// Short calibration
    #[default]
    Fast,
    /// Single-point calibration
    OneDot,
}

impl CalibrationMode {
    pub fn name(&self) -> &'static str {
        match self {
            CalibrationMode::Legacy => "Legacy",
            CalibrationMode::Fast => "Fast",
            CalibrationMode::OneDot => "OneDot",
        }
    }
}

/// When a gazed-at interactive object receives a push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushMode {
    /// Every tick while the gaze rests on the object
    #[default]
    Continuous,
    /// Once each time the gaze enters the object
    OnEnter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub mode: CalibrationMode,
    /// Request a calibration as soon as the tracker starts
    pub on_start: bool,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            mode: CalibrationMode::Fast,
            on_start: true,
        }
    }
}

/// Sphere-cast settings for finding the gazed-at surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Radius of the swept sphere in meters
    pub radius: f32,
    /// Furthest distance the sweep travels
    pub max_distance: f32,
    /// Distance of the synthesized point when nothing is hit
    pub fallback_distance: f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            radius: 0.1,
            max_distance: 50.0,
            fallback_distance: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// How far the marker sits in front of the hit surface
    pub surface_offset: f32,
    /// Uniform scale per meter of distance
    pub scale_factor: f32,
    /// Initial visibility
    pub visible: bool,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            surface_offset: 0.01,
            scale_factor: 1.0,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub enabled: bool,
    /// Tag an object must carry to be pushed
    pub tag: String,
    /// Force magnitude in newtons
    pub force: f32,
    pub mode: PushMode,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tag: "interactive".to_string(),
            force: 5.0,
            mode: PushMode::Continuous,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Milliseconds between ticks
    pub tick_rate_ms: u64,
    /// Decimal places for vector and quaternion text
    pub precision: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            precision: 3,
        }
    }
}

/// Key bindings. Each value is a single character or `"space"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub calibrate: String,
    pub toggle_filter: String,
    pub log_sample: String,
    pub toggle_indicator: String,
    pub quit: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            calibrate: "space".to_string(),
            toggle_filter: "f".to_string(),
            log_sample: "l".to_string(),
            toggle_indicator: "i".to_string(),
            quit: "q".to_string(),
        }
    }
}

impl KeyConfig {
    /// Parse a binding value into the character it stands for
    pub fn parse_key(value: &str) -> Option<char> {
        if value.eq_ignore_ascii_case("space") {
            return Some(' ');
        }
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// All bindings as `(field, value)` pairs
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("keys.calibrate", self.calibrate.as_str()),
            ("keys.toggle_filter", self.toggle_filter.as_str()),
            ("keys.log_sample", self.log_sample.as_str()),
            ("keys.toggle_indicator", self.toggle_indicator.as_str()),
            ("keys.quit", self.quit.as_str()),
        ]
    }
}

/// Settings for the software headset used without hardware
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// RNG seed; random when unset
    pub seed: Option<u64>,
    /// Angular jitter amplitude in radians
    pub jitter: f32,
    /// Chance per sample that the eyes are closed
    pub blink_probability: f32,
    /// Ticks a calibration takes to complete
    pub calibration_ticks: u32,
    /// Buffered samples produced per tick
    pub samples_per_tick: u32,
    /// Interpupillary distance in meters
    pub ipd: f32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            jitter: 0.01,
            blink_probability: 0.02,
            calibration_ticks: 40,
            samples_per_tick: 4,
            ipd: 0.063,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Log file used by the interactive HUD
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub calibration: CalibrationConfig,
    pub probe: ProbeConfig,
    pub indicator: IndicatorConfig,
    pub push: PushConfig,
    pub display: DisplayConfig,
    pub keys: KeyConfig,
    pub simulator: SimulatorConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Per-user config file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gaze-hud").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the given file, else the per-user file if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the tracker cannot work with
    pub fn validate(&self) -> Result<()> {
        let probe = &self.probe;
        if !(probe.radius > 0.0) {
            return Err(ConfigError::invalid("probe.radius", "must be greater than zero"));
        }
        if !(probe.max_distance > 0.0) {
            return Err(ConfigError::invalid("probe.max_distance", "must be greater than zero"));
        }
        if !(probe.fallback_distance >= 0.0) {
            return Err(ConfigError::invalid("probe.fallback_distance", "must not be negative"));
        }
        if probe.fallback_distance > probe.max_distance {
            return Err(ConfigError::invalid(
                "probe.fallback_distance",
                format!(
                    "{} exceeds probe.max_distance {}",
                    probe.fallback_distance, probe.max_distance
                ),
            ));
        }

        if !(self.indicator.surface_offset >= 0.0) {
            return Err(ConfigError::invalid("indicator.surface_offset", "must not be negative"));
        }
        if !(self.indicator.scale_factor > 0.0) {
            return Err(ConfigError::invalid("indicator.scale_factor", "must be greater than zero"));
        }

        if self.push.enabled {
            if !(self.push.force > 0.0) {
                return Err(ConfigError::invalid("push.force", "must be greater than zero"));
            }
            if self.push.tag.trim().is_empty() {
                return Err(ConfigError::invalid("push.tag", "must not be empty"));
            }
        }

        if self.display.tick_rate_ms == 0 {
            return Err(ConfigError::invalid("display.tick_rate_ms", "must be greater than zero"));
        }

        // Bindings match case-insensitively
        let mut bound: HashMap<char, &str> = HashMap::new();
        for (field, value) in self.keys.entries() {
            let Some(key) = KeyConfig::parse_key(value) else {
                return Err(ConfigError::invalid(
                    field,
                    format!("'{}' is not a single character or \"space\"", value),
                ));
            };
            if let Some(other) = bound.insert(key.to_ascii_lowercase(), field) {
                return Err(ConfigError::invalid(
                    field,
                    format!("'{}' is already bound to {}", value, other),
                ));
            }
        }

        let sim = &self.simulator;
        if !(0.0..=1.0).contains(&sim.blink_probability) {
            return Err(ConfigError::invalid(
                "simulator.blink_probability",
                "must be between 0 and 1",
            ));
        }
        if !(sim.jitter >= 0.0) {
            return Err(ConfigError::invalid("simulator.jitter", "must not be negative"));
        }
        if !(sim.ipd >= 0.0) {
            return Err(ConfigError::invalid("simulator.ipd", "must not be negative"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.calibration.mode, CalibrationMode::Fast);
        assert_eq!(config.push.mode, PushMode::Continuous);
        assert_eq!(config.display.precision, 3);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [probe]
            radius = 0.25

            [push]
            mode = "on_enter"

            [calibration]
            mode = "one_dot"
            "#,
        )
        .unwrap();

        assert_eq!(config.probe.radius, 0.25);
        assert_eq!(config.probe.fallback_distance, 2.0);
        assert_eq!(config.push.mode, PushMode::OnEnter);
        assert_eq!(config.calibration.mode, CalibrationMode::OneDot);
        assert!(config.calibration.on_start);
    }

    #[test]
    fn test_rejects_zero_radius() {
        let err = AppConfig::from_toml_str("[probe]\nradius = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "probe.radius", .. }));
    }

    #[test]
    fn test_rejects_fallback_beyond_max() {
        let err = AppConfig::from_toml_str("[probe]\nmax_distance = 1.0\nfallback_distance = 3.0")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "probe.fallback_distance", .. }));
    }

    #[test]
    fn test_rejects_bad_key_binding() {
        let err = AppConfig::from_toml_str("[keys]\nquit = \"esc\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "keys.quit", .. }));
    }

    #[test]
    fn test_rejects_duplicate_key_binding() {
        let err = AppConfig::from_toml_str("[keys]\ntoggle_filter = \"L\"").unwrap_err();
        match err {
            ConfigError::Invalid { field, reason } => {
                assert_eq!(field, "keys.log_sample");
                assert!(reason.contains("keys.toggle_filter"));
            }
            other => panic!("expected invalid binding, got {:?}", other),
        }
    }

    #[test]
    fn test_disabled_push_skips_force_check() {
        let config = AppConfig::from_toml_str("[push]\nenabled = false\nforce = 0.0").unwrap();
        assert!(!config.push.enabled);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(KeyConfig::parse_key("space"), Some(' '));
        assert_eq!(KeyConfig::parse_key("SPACE"), Some(' '));
        assert_eq!(KeyConfig::parse_key("x"), Some('x'));
        assert_eq!(KeyConfig::parse_key(""), None);
        assert_eq!(KeyConfig::parse_key("ab"), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\ntick_rate_ms = 20").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.display.tick_rate_ms, 20);
    }

    #[test]
    fn test_load_reports_parse_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display\ntick_rate_ms = ").unwrap();

        match AppConfig::load(file.path()) {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = AppConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[probe]"));
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), config);
    }
}
