//! Terminal application loop

mod framework;

pub use framework::{OpticalApp, OpticalAppRunner, TickInfo};
