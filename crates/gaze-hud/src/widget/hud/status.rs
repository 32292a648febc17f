//! Key hints and tracker state along the bottom edge

use crate::context::FrameContext;
use crate::input::{Action, KeyBindings};
use crate::renderer::{Color, RenderBackend};
use crate::widget::{cell_fraction, HudWidget};

pub struct StatusBar {
    id: String,
    hints: String,
    state: String,
}

impl StatusBar {
    pub fn new(id: impl Into<String>, bindings: &KeyBindings) -> Self {
        let mut hints: Vec<String> = [
            Action::RequestCalibration,
            Action::ToggleOutputFilter,
            Action::LogSample,
            Action::ToggleIndicator,
            Action::Quit,
        ]
        .into_iter()
        .filter_map(|action| {
            bindings
                .key_for(action)
                .map(|key| format!("[{}] {}", key_label(key), action))
        })
        .collect();
        hints.push("[wasd] head".to_string());
        hints.push("[arrows] eyes".to_string());

        Self {
            id: id.into(),
            hints: hints.join("  "),
            state: String::new(),
        }
    }

    pub fn hints(&self) -> &str {
        &self.hints
    }
}

fn key_label(key: char) -> String {
    if key == ' ' {
        "space".to_string()
    } else {
        key.to_string()
    }
}

impl HudWidget for StatusBar {
    fn id(&self) -> &str {
        &self.id
    }

    fn update(&mut self, ctx: &FrameContext<'_>) {
        let telemetry = ctx.telemetry;
        self.state = format!(
            "tick {}  gaze {}  filter {}  {}",
            ctx.tick,
            telemetry.gaze_status,
            telemetry.output_filter,
            if telemetry.calibrated {
                "calibrated"
            } else {
                "not calibrated"
            }
        );
    }

    fn render(&self, backend: &mut dyn RenderBackend) {
        let rows = backend.capabilities().height;
        if rows < 2 {
            return;
        }
        let x = cell_fraction(1, backend.capabilities().width);
        backend.draw_hud_text(x, cell_fraction(rows - 1, rows), &self.hints, Color::HUD_DIM);
        if !self.state.is_empty() && rows >= 3 {
            backend.draw_hud_text(x, cell_fraction(rows - 3, rows), &self.state, Color::Grey);
        }
    }
}
