//! Input abstraction for the gaze HUD
//!
//! Provides:
//! - Head pose used to place head-local gaze in the world
//! - Key-driven actions and their configurable bindings
//! - Keyboard simulation of head and eye movement for terminal development

mod action;
mod event;
mod head;
mod simulator;

pub use action::{Action, KeyBindings};
pub use event::InputEvent;
pub use head::HeadPose;
pub use simulator::InputSimulator;
