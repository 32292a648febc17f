//! HUD (Heads-Up Display) widgets
//!
//! Fixed screen-space elements for persistent information display.

mod panel;
mod status;

pub use panel::TelemetryPanel;
pub use status::StatusBar;
