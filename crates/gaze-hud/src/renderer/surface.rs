//! Surface description and the HUD palette

/// What a render surface offers to widgets
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceCapabilities {
    /// Width in cells
    pub width: u32,
    /// Height in cells
    pub height: u32,
    /// Glyphs are depth tested against each other
    pub supports_depth: bool,
    /// Vertical field of view in degrees
    pub fov_vertical: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Terminal default
    #[default]
    Reset,
    Black,
    DarkGrey,
    Grey,
    White,
    Yellow,
    Rgb(u8, u8, u8),
}

impl Color {
    pub const HUD_CYAN: Self = Color::Rgb(0, 255, 255);
    pub const HUD_DIM: Self = Color::Rgb(70, 110, 130);
    pub const STATUS_GREEN: Self = Color::Rgb(50, 205, 50);
    pub const ALERT_RED: Self = Color::Rgb(220, 20, 60);
    pub const GAZE_AMBER: Self = Color::Rgb(255, 176, 0);
    pub const BACKGROUND: Self = Color::Rgb(5, 7, 12);

    pub fn to_crossterm(&self) -> crossterm::style::Color {
        use crossterm::style::Color as Term;
        match *self {
            Color::Reset => Term::Reset,
            Color::Black => Term::Black,
            Color::DarkGrey => Term::DarkGrey,
            Color::Grey => Term::Grey,
            Color::White => Term::White,
            Color::Yellow => Term::Yellow,
            Color::Rgb(r, g, b) => Term::Rgb { r, g, b },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_crossterm() {
        assert_eq!(
            Color::HUD_CYAN.to_crossterm(),
            crossterm::style::Color::Rgb { r: 0, g: 255, b: 255 }
        );
        assert_eq!(Color::default().to_crossterm(), crossterm::style::Color::Reset);
    }
}
