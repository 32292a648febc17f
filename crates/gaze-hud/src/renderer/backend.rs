//! Drawing surface shared by the terminal and headset compositors

use super::surface::{Color, SurfaceCapabilities};
use crate::spatial::{Point3D, Transform};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to initialize renderer: {0}")]
    Init(String),

    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Symbol placed at a world position
#[derive(Debug, Clone, PartialEq)]
pub struct RenderGlyph {
    pub symbol: String,
    pub position: Point3D,
    pub color: Color,
}

impl RenderGlyph {
    pub fn new(symbol: impl Into<String>, position: Point3D) -> Self {
        Self {
            symbol: symbol.into(),
            position,
            color: Color::White,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// A surface the HUD draws on.
///
/// World-space calls (`draw_glyph`, `draw_line`, `project`) go through the
/// camera. Screen-space calls take fractions of the surface, `0.0..1.0` on
/// both axes from the top-left corner, and are drawn over the world.
pub trait RenderBackend {
    fn capabilities(&self) -> SurfaceCapabilities;

    /// Start a frame; the surface is cleared
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// Present the frame
    fn end_frame(&mut self) -> Result<(), RenderError>;

    fn clear(&mut self, color: Color);

    /// Draw a glyph unless something nearer already covers its cell
    fn draw_glyph(&mut self, glyph: &RenderGlyph);

    fn draw_line(&mut self, from: Point3D, to: Point3D, color: Color);

    /// Bordered box in screen space
    fn draw_hud_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Text in screen space, clipped at the right edge
    fn draw_hud_text(&mut self, x: f32, y: f32, text: &str, color: Color);

    /// Normalized device coordinates and view depth of a world point, or
    /// `None` when it lies behind the camera or outside the clip range
    fn project(&self, point: Point3D) -> Option<(f32, f32, f32)>;

    /// Rows an object of `size` meters covers at view depth `depth`
    fn apparent_rows(&self, size: f32, depth: f32) -> f32;

    fn camera(&self) -> &Transform;

    fn set_camera(&mut self, camera: Transform);
}
