//! Input events produced by the keyboard simulator

use crossterm::event::KeyEvent;

use super::{Action, HeadPose};

/// Unified input event for the HUD
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Simulated head moved to a new pose
    HeadPose(HeadPose),

    /// Steer the simulated eyes by yaw/pitch deltas (radians)
    SteerGaze {
        yaw: f32,
        pitch: f32,
    },

    /// A bound key was pressed
    Action(Action),

    /// Fallback keyboard input
    Key(KeyEvent),
}

impl InputEvent {
    /// The bound action, if this event carries one
    pub fn action(&self) -> Option<Action> {
        match self {
            InputEvent::Action(action) => Some(*action),
            _ => None,
        }
    }
}
