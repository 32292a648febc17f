//! Rendering backend abstraction for the gaze HUD
//!
//! Provides a trait-based abstraction over rendering backends:
//! - Terminal backend for development and simulation
//! - Headset compositors behind the same trait

mod backend;
mod surface;
pub mod terminal;

pub use backend::{RenderBackend, RenderError, RenderGlyph};
pub use surface::{Color, SurfaceCapabilities};
