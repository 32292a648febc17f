//! gaze-hud-config: configuration for the gaze-hud workspace
//!
//! Settings are read from a TOML file. Every section and field has a default,
//! so an empty or missing file yields a working configuration.

pub mod config;
mod error;

pub use config::{
    AppConfig, CalibrationConfig, CalibrationMode, DisplayConfig, IndicatorConfig, KeyConfig,
    LoggingConfig, ProbeConfig, PushConfig, PushMode, SimulatorConfig,
};
pub use error::{ConfigError, Result};
