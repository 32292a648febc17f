//! Widget trait

use crate::context::FrameContext;
use crate::renderer::RenderBackend;

/// A HUD element refreshed from each tick and drawn afterwards
pub trait HudWidget {
    /// Name used in logs
    fn id(&self) -> &str;

    /// Pull new state from the current frame
    fn update(&mut self, ctx: &FrameContext<'_>);

    fn render(&self, backend: &mut dyn RenderBackend);
}
