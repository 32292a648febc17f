//! Telemetry panel widget

use crate::context::FrameContext;
use crate::renderer::{Color, RenderBackend};
use crate::telemetry::TelemetrySection;
use crate::widget::{cell_fraction, HudWidget};

/// Bordered screen-space box listing the telemetry sections
pub struct TelemetryPanel {
    id: String,
    /// Top-left corner in cells
    column: u32,
    row: u32,
    /// Width in cells, border included
    width: u32,
    title: String,
    sections: Vec<TelemetrySection>,
    border_color: Color,
    visible: bool,
}

impl TelemetryPanel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            column: 1,
            row: 1,
            width: 48,
            title: "EYE TRACKING".to_string(),
            sections: Vec::new(),
            border_color: Color::HUD_CYAN,
            visible: true,
        }
    }

    /// Set the top-left cell
    pub fn position(mut self, column: u32, row: u32) -> Self {
        self.column = column;
        self.row = row;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width.max(4);
        self
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Rows the panel occupies, border included
    pub fn height(&self) -> u32 {
        let content: usize = self.sections.iter().map(|s| s.lines.len() + 1).sum();
        content as u32 + 3
    }

    pub fn sections(&self) -> &[TelemetrySection] {
        &self.sections
    }

    fn line_color(line: &str) -> Color {
        match line.strip_prefix("Status: ") {
            Some("Valid") | Some("Tracked") => Color::STATUS_GREEN,
            Some("Invalid") => Color::ALERT_RED,
            Some(_) => Color::Yellow,
            None => Color::White,
        }
    }
}

impl HudWidget for TelemetryPanel {
    fn id(&self) -> &str {
        &self.id
    }

    fn update(&mut self, ctx: &FrameContext<'_>) {
        self.sections = ctx.telemetry.sections(ctx.precision);
    }

    fn render(&self, backend: &mut dyn RenderBackend) {
        if !self.visible {
            return;
        }

        let caps = backend.capabilities();
        let (columns, rows) = (caps.width, caps.height);
        let height = self.height().min(rows.saturating_sub(self.row));
        backend.draw_hud_rect(
            cell_fraction(self.column, columns),
            cell_fraction(self.row, rows),
            cell_fraction(self.width, columns),
            cell_fraction(height, rows),
            self.border_color,
        );

        let mut lines = vec![(self.title.clone(), Color::GAZE_AMBER)];
        for section in &self.sections {
            lines.push((section.title.to_string(), Color::HUD_CYAN));
            for line in &section.lines {
                lines.push((format!("  {line}"), Self::line_color(line)));
            }
        }

        let text_x = cell_fraction(self.column + 2, columns);
        let inner_rows = height.saturating_sub(2) as usize;
        for (offset, (text, color)) in lines.iter().take(inner_rows).enumerate() {
            let row = self.row + 1 + offset as u32;
            backend.draw_hud_text(text_x, cell_fraction(row, rows), text, *color);
        }
    }
}
