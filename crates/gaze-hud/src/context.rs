//! Per-frame context handed to widgets

use std::time::Duration;

use crate::scene::Scene;
use crate::telemetry::GazeTelemetry;
use crate::tracker::FrameOutput;

/// Read-only view of one tick, passed to widgets during update
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Current tick count
    pub tick: u64,
    /// Time since app start
    pub time: Duration,
    /// Time since last frame
    pub delta_time: Duration,
    /// Decimal places for displayed values
    pub precision: usize,
    pub telemetry: &'a GazeTelemetry,
    pub scene: &'a Scene,
    /// Tracker result; `None` before the first tick
    pub output: Option<&'a FrameOutput>,
}
