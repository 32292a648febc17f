//! Input simulator for terminal development
//!
//! Maps keyboard inputs to simulated head and eye movement for development
//! without XR hardware.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Action, HeadPose, InputEvent, KeyBindings};
use crate::spatial::Point3D;

/// Head pitch limit, in radians
const MAX_HEAD_PITCH: f32 = 1.2;

/// Simulates head and gaze inputs from the keyboard
pub struct InputSimulator {
    bindings: KeyBindings,
    /// Simulated head position
    head_position: Point3D,
    /// Current head yaw (left-right rotation)
    head_yaw: f32,
    /// Current head pitch (up-down rotation, positive looks down)
    head_pitch: f32,
    /// Eye steering step per key press
    gaze_speed: f32,
    /// Head rotation step per key press
    head_speed: f32,
}

impl Default for InputSimulator {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputSimulator {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            head_position: HeadPose::default().position,
            head_yaw: 0.0,
            head_pitch: 0.0,
            gaze_speed: 0.05,
            head_speed: 0.1,
        }
    }

    /// Process a keyboard event and generate simulated input events
    pub fn process_key(&mut self, key: KeyEvent) -> Vec<InputEvent> {
        let mut events = Vec::new();

        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return events;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key.code {
                events.push(InputEvent::Action(Action::Quit));
            } else {
                events.push(InputEvent::Key(key));
            }
            return events;
        }

        // Configured bindings take precedence over movement keys
        if let KeyCode::Char(c) = key.code {
            if let Some(action) = self.bindings.action_for(c) {
                events.push(InputEvent::Action(action));
                return events;
            }
        }

        match key.code {
            // Arrow keys: steer the eyes
            KeyCode::Up => events.push(self.steer(0.0, -self.gaze_speed)),
            KeyCode::Down => events.push(self.steer(0.0, self.gaze_speed)),
            KeyCode::Left => events.push(self.steer(-self.gaze_speed, 0.0)),
            KeyCode::Right => events.push(self.steer(self.gaze_speed, 0.0)),

            // WASD: head rotation
            KeyCode::Char('w') | KeyCode::Char('W') => {
                self.head_pitch = (self.head_pitch - self.head_speed).max(-MAX_HEAD_PITCH);
                events.push(InputEvent::HeadPose(self.head_pose()));
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.head_pitch = (self.head_pitch + self.head_speed).min(MAX_HEAD_PITCH);
                events.push(InputEvent::HeadPose(self.head_pose()));
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.head_yaw -= self.head_speed;
                events.push(InputEvent::HeadPose(self.head_pose()));
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.head_yaw += self.head_speed;
                events.push(InputEvent::HeadPose(self.head_pose()));
            }

            KeyCode::Esc => events.push(InputEvent::Action(Action::Quit)),

            // Also pass through the raw key event
            _ => events.push(InputEvent::Key(key)),
        }

        events
    }

    fn steer(&self, yaw: f32, pitch: f32) -> InputEvent {
        InputEvent::SteerGaze { yaw, pitch }
    }

    /// Get current simulated head pose
    pub fn head_pose(&self) -> HeadPose {
        HeadPose::from_yaw_pitch(self.head_position, self.head_yaw, self.head_pitch)
    }

    /// Reset simulator to default state
    pub fn reset(&mut self) {
        self.head_position = HeadPose::default().position;
        self.head_yaw = 0.0;
        self.head_pitch = 0.0;
    }
}
