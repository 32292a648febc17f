//! HUD widgets
//!
//! - Screen-space HUD elements (telemetry panel, status bar)
//! - World-anchored elements (gaze marker, scene view)

pub mod anchored;
pub mod hud;
mod traits;

pub use traits::HudWidget;

/// Fractional screen coordinate of the centre of cell `n` out of `total`.
/// Backends floor fractions back to cells, so the half-cell offset keeps
/// the round trip exact.
pub(crate) fn cell_fraction(n: u32, total: u32) -> f32 {
    (n as f32 + 0.5) / total.max(1) as f32
}
