//! Terminal backend implementation

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use unicode_width::UnicodeWidthChar;

use super::Projection;
use crate::renderer::{Color, RenderBackend, RenderError, RenderGlyph, SurfaceCapabilities};
use crate::spatial::{Point3D, Transform};

/// Vertical field of view of the simulated display
const FOV_VERTICAL_DEGREES: f32 = 70.0;

/// Cell in the terminal buffer
#[derive(Debug, Clone, PartialEq)]
struct Cell {
    /// Empty for the trailing half of a wide character
    symbol: String,
    fg: Color,
    bg: Color,
    depth: f32,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Self {
            symbol: " ".to_string(),
            fg: Color::White,
            bg,
            depth: f32::MAX,
        }
    }
}

/// Terminal rendering backend with depth buffer and diff flushing
pub struct TerminalBackend {
    width: u32,
    height: u32,
    buffer: Vec<Cell>,
    /// Previous frame buffer for diff rendering
    prev_buffer: Vec<Cell>,
    projection: Projection,
    camera: Transform,
    clear_color: Color,
    /// Query the terminal for its size each frame
    track_terminal: bool,
}

impl TerminalBackend {
    /// Create a backend sized to the current terminal
    pub fn new() -> Result<Self, RenderError> {
        let (width, height) = terminal::size()?;
        if width == 0 || height == 0 {
            return Err(RenderError::Init(format!(
                "terminal reports an empty size ({width}x{height})"
            )));
        }
        let mut backend = Self::with_size(width as u32, height as u32);
        backend.track_terminal = true;
        Ok(backend)
    }

    /// Create an off-screen backend of a fixed size
    pub fn with_size(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let size = (width as usize) * (height as usize);
        let clear_color = Color::BACKGROUND;
        Self {
            width,
            height,
            buffer: vec![Cell::blank(clear_color); size],
            prev_buffer: vec![Cell::blank(clear_color); size],
            projection: Projection::perspective(FOV_VERTICAL_DEGREES, width, height),
            camera: Transform::identity(),
            clear_color,
            track_terminal: false,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width.max(1);
        self.height = height.max(1);
        let size = (self.width as usize) * (self.height as usize);
        self.buffer = vec![Cell::blank(self.clear_color); size];
        // Force a full repaint after a resize
        self.prev_buffer = vec![Cell::blank(Color::Reset); size];
        self.projection.resize(self.width, self.height);
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Set a cell in the buffer with depth test
    fn set_cell(&mut self, x: u32, y: u32, symbol: &str, fg: Color, depth: f32) {
        if let Some(idx) = self.index(x, y) {
            let cell = &mut self.buffer[idx];
            if depth < cell.depth {
                cell.symbol = symbol.to_string();
                cell.fg = fg;
                cell.depth = depth;
            }
        }
    }

    /// Set a cell without depth test (for HUD elements)
    fn set_cell_hud(&mut self, x: u32, y: u32, symbol: String, fg: Color) {
        if let Some(idx) = self.index(x, y) {
            let cell = &mut self.buffer[idx];
            cell.symbol = symbol;
            cell.fg = fg;
            // HUD is always on top
            cell.depth = 0.0;
        }
    }

    fn to_cells(&self, x: f32, y: f32) -> (u32, u32) {
        (
            (x.max(0.0) * self.width as f32) as u32,
            (y.max(0.0) * self.height as f32) as u32,
        )
    }

    /// Text currently in a buffer row
    pub fn row_text(&self, y: u32) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        self.buffer[start..start + self.width as usize]
            .iter()
            .map(|cell| cell.symbol.as_str())
            .collect()
    }

    /// Symbol drawn at a cell
    pub fn symbol_at(&self, x: u32, y: u32) -> Option<&str> {
        self.index(x, y).map(|idx| self.buffer[idx].symbol.as_str())
    }
}

impl RenderBackend for TerminalBackend {
    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities {
            width: self.width,
            height: self.height,
            supports_depth: true,
            fov_vertical: self.projection.fov_vertical.to_degrees(),
        }
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        if self.track_terminal {
            let (width, height) = terminal::size()?;
            self.resize(width as u32, height as u32);
        }

        std::mem::swap(&mut self.buffer, &mut self.prev_buffer);
        let clear_color = self.clear_color;
        self.clear(clear_color);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let mut stdout = io::stdout();
        queue!(stdout, cursor::Hide)?;

        // Diff render - only update changed cells
        for y in 0..self.height {
            for x in 0..self.width {
                let Some(idx) = self.index(x, y) else {
                    continue;
                };
                let cell = &self.buffer[idx];
                if cell.symbol.is_empty() || cell == &self.prev_buffer[idx] {
                    continue;
                }
                queue!(
                    stdout,
                    cursor::MoveTo(x as u16, y as u16),
                    SetForegroundColor(cell.fg.to_crossterm()),
                    SetBackgroundColor(cell.bg.to_crossterm()),
                    Print(&cell.symbol)
                )?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = color;
        for cell in &mut self.buffer {
            *cell = Cell::blank(color);
        }
    }

    fn draw_glyph(&mut self, glyph: &RenderGlyph) {
        if let Some((x, y, depth)) = self.projection.project_to_cell(glyph.position, &self.camera) {
            self.set_cell(x as u32, y as u32, &glyph.symbol, glyph.color, depth);
        }
    }

    fn draw_line(&mut self, from: Point3D, to: Point3D, color: Color) {
        let from_cell = self.projection.project_to_cell(from, &self.camera);
        let to_cell = self.projection.project_to_cell(to, &self.camera);
        let (Some((x1, y1, d1)), Some((x2, y2, d2))) = (from_cell, to_cell) else {
            return;
        };

        // Bresenham's line algorithm
        let (x1, y1, x2, y2) = (x1 as i32, y1 as i32, x2 as i32, y2 as i32);
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let steps = dx.max(-dy).max(1) as f32;
        let symbol = if dx > -dy {
            "─"
        } else if -dy > dx {
            "│"
        } else {
            "·"
        };

        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);
        loop {
            let t = ((x - x1).abs().max((y - y1).abs())) as f32 / steps;
            let depth = d1 + (d2 - d1) * t;
            if x >= 0 && y >= 0 {
                self.set_cell(x as u32, y as u32, symbol, color, depth);
            }
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_hud_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let (sx, sy) = self.to_cells(x, y);
        let (sw, sh) = self.to_cells(width, height);
        if sw < 2 || sh < 2 {
            return;
        }

        for dy in 0..sh {
            for dx in 0..sw {
                let top = dy == 0;
                let bottom = dy == sh - 1;
                let left = dx == 0;
                let right = dx == sw - 1;
                let symbol = match (top, bottom, left, right) {
                    (true, _, true, _) => "┌",
                    (true, _, _, true) => "┐",
                    (_, true, true, _) => "└",
                    (_, true, _, true) => "┘",
                    (true, _, _, _) | (_, true, _, _) => "─",
                    (_, _, true, _) | (_, _, _, true) => "│",
                    _ => " ",
                };
                self.set_cell_hud(sx + dx, sy + dy, symbol.to_string(), color);
            }
        }
    }

    fn draw_hud_text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        let (mut cx, sy) = self.to_cells(x, y);

        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as u32;
            if width == 0 {
                continue;
            }
            if cx + width > self.width {
                break;
            }
            self.set_cell_hud(cx, sy, ch.to_string(), color);
            for pad in 1..width {
                self.set_cell_hud(cx + pad, sy, String::new(), color);
            }
            cx += width;
        }
    }

    fn project(&self, point: Point3D) -> Option<(f32, f32, f32)> {
        self.projection.project(point, &self.camera)
    }

    fn apparent_rows(&self, size: f32, depth: f32) -> f32 {
        self.projection.apparent_rows(size, depth)
    }

    fn camera(&self) -> &Transform {
        &self.camera
    }

    fn set_camera(&mut self, camera: Transform) {
        self.camera = camera;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hud_text() {
        let mut backend = TerminalBackend::with_size(20, 4);
        backend.draw_hud_text(0.0, 0.0, "Status: Valid", Color::White);
        assert!(backend.row_text(0).starts_with("Status: Valid"));
    }

    #[test]
    fn test_wide_characters_take_two_cells() {
        let mut backend = TerminalBackend::with_size(10, 2);
        backend.draw_hud_text(0.0, 0.0, "視線ab", Color::White);
        assert_eq!(backend.symbol_at(0, 0), Some("視"));
        assert_eq!(backend.symbol_at(1, 0), Some(""));
        assert_eq!(backend.symbol_at(4, 0), Some("a"));
    }

    #[test]
    fn test_text_is_clipped() {
        let mut backend = TerminalBackend::with_size(5, 1);
        backend.draw_hud_text(0.0, 0.0, "abcdefgh", Color::White);
        assert_eq!(backend.row_text(0), "abcde");
    }

    #[test]
    fn test_hud_rect_corners() {
        let mut backend = TerminalBackend::with_size(10, 10);
        backend.draw_hud_rect(0.0, 0.0, 0.5, 0.5, Color::HUD_CYAN);
        assert_eq!(backend.symbol_at(0, 0), Some("┌"));
        assert_eq!(backend.symbol_at(4, 0), Some("┐"));
        assert_eq!(backend.symbol_at(0, 4), Some("└"));
        assert_eq!(backend.symbol_at(4, 4), Some("┘"));
        assert_eq!(backend.symbol_at(0, 2), Some("│"));
    }

    #[test]
    fn test_depth_test_keeps_nearest_glyph() {
        let mut backend = TerminalBackend::with_size(40, 20);
        backend.draw_glyph(&RenderGlyph::new("F", Point3D::new(0.0, 0.0, 8.0)));
        backend.draw_glyph(&RenderGlyph::new("N", Point3D::new(0.0, 0.0, 2.0)));
        backend.draw_glyph(&RenderGlyph::new("X", Point3D::new(0.0, 0.0, 5.0)));

        assert!(backend.row_text(10).contains('N'));
        assert!(!backend.row_text(10).contains('X'));
    }

    #[test]
    fn test_clear_resets_buffer() {
        let mut backend = TerminalBackend::with_size(10, 2);
        backend.draw_hud_text(0.0, 0.0, "abc", Color::White);
        backend.clear(Color::Black);
        assert_eq!(backend.row_text(0).trim(), "");
    }
}
