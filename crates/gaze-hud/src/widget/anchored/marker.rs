//! Gaze indicator marker

use crate::context::FrameContext;
use crate::renderer::{Color, RenderBackend, RenderGlyph};
use crate::spatial::Point3D;
use crate::widget::{cell_fraction, HudWidget};

/// Marker diameter in meters at unit scale
const MARKER_SIZE: f32 = 0.1;

/// Draws the indicator where the gaze lands plus a line naming the target
pub struct GazeMarker {
    id: String,
    position: Point3D,
    scale: f32,
    visible: bool,
    /// Name and id of the object under the gaze
    target: Option<String>,
    distance: f32,
    pushed: bool,
    precision: usize,
    placed: bool,
}

impl GazeMarker {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: Point3D::ORIGIN,
            scale: 1.0,
            visible: true,
            target: None,
            distance: 0.0,
            pushed: false,
            precision: 3,
            placed: false,
        }
    }

    /// Icon for a marker spanning `rows` terminal rows
    fn icon(rows: f32) -> &'static str {
        if rows >= 3.0 {
            "◎"
        } else if rows >= 1.0 {
            "○"
        } else {
            "·"
        }
    }

    fn color(&self) -> Color {
        match (&self.target, self.pushed) {
            (Some(_), true) => Color::GAZE_AMBER,
            (Some(_), false) => Color::HUD_CYAN,
            (None, _) => Color::HUD_DIM,
        }
    }

    /// Text of the status line
    pub fn status_line(&self) -> String {
        let p = self.precision;
        match &self.target {
            Some(name) => format!(
                "Gaze: {name} at {:.p$} m{}",
                self.distance,
                if self.pushed { " [push]" } else { "" }
            ),
            None => format!("Gaze: no hit, fallback {:.p$} m", self.distance),
        }
    }
}

impl HudWidget for GazeMarker {
    fn id(&self) -> &str {
        &self.id
    }

    fn update(&mut self, ctx: &FrameContext<'_>) {
        self.precision = ctx.precision;
        let Some(output) = ctx.output else {
            return;
        };

        let indicator = &output.indicator;
        self.placed = true;
        self.position = indicator.transform.position;
        self.scale = indicator.scale();
        self.visible = indicator.visible;
        self.distance = indicator.distance;
        self.pushed = output.pushed.is_some();
        self.target = indicator.target.map(|id| match ctx.scene.get(id) {
            Some(object) => format!("{} {}", object.name, id),
            None => id.to_string(),
        });
    }

    fn render(&self, backend: &mut dyn RenderBackend) {
        if !self.placed {
            return;
        }

        if self.visible {
            if let Some((_, _, depth)) = backend.project(self.position) {
                let rows = backend.apparent_rows(self.scale * MARKER_SIZE, depth);
                let glyph = RenderGlyph::new(Self::icon(rows), self.position).with_color(self.color());
                backend.draw_glyph(&glyph);
            }
        }

        let caps = backend.capabilities();
        if caps.height >= 2 {
            backend.draw_hud_text(
                cell_fraction(1, caps.width),
                cell_fraction(caps.height - 2, caps.height),
                &self.status_line(),
                self.color(),
            );
        }
    }
}
