//! Terminal backend implementation for optical UI development

mod backend;
mod projection;

pub use backend::TerminalBackend;
pub use projection::Projection;
