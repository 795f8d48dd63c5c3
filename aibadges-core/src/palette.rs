//! Badge colors, shared by the SVG composer and the procedural renderer.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

pub const GRADIENT_START: Rgb = Rgb(0x7B, 0x5C, 0xF9);
pub const GRADIENT_END: Rgb = Rgb(0xE5, 0x49, 0xFF);
pub const RIGHT_FILL_TOP: Rgb = Rgb(0x1F, 0x29, 0x37);
pub const RIGHT_FILL: Rgb = Rgb(0x11, 0x18, 0x27);
pub const RIGHT_TEXT: Rgb = Rgb(0xE5, 0xE7, 0xEB);
pub const AI_TEXT: Rgb = Rgb(0xFF, 0xFF, 0xFF);
pub const SPARKLE: Rgb = Rgb(0xFD, 0xF7, 0xFF);
pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

/// Outline stroke opacity (white).
pub const OUTLINE_OPACITY: f32 = 0.18;
/// Divider line opacity (white).
pub const DIVIDER_OPACITY: f32 = 0.08;

pub const FONT_FAMILY: &str = "Inter, 'Segoe UI', 'Helvetica Neue', Arial, sans-serif";
