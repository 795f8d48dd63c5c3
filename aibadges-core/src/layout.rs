//! Layout - chip widths from an approximate text width
//!
//! The character width is a visual estimate for the badge typeface, not a
//! real font metric. Output must stay stable, so do not swap in shaping.

use serde::{Deserialize, Serialize};

/// Width of the left "AI" chip at 1x.
pub const LEFT_WIDTH: u32 = 44;
/// Badge height at 1x.
pub const HEIGHT: u32 = 20;
/// Horizontal padding on each side of the label.
pub const PADDING: u32 = 10;
/// Average advance per character in the badge typeface.
pub const CHAR_WIDTH: f64 = 7.0;
/// Corner radius of the outer pill.
pub const CORNER_RADIUS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub left_width: u32,
    pub right_width: u32,
    pub total_width: u32,
    pub height: u32,
}

impl Layout {
    /// Pixel size at a raster scale factor.
    pub fn scaled(&self, factor: u32) -> [u32; 2] {
        [self.total_width * factor, self.height * factor]
    }
}

/// Estimated label width, rounded up to whole pixels.
pub fn text_width(label: &str) -> u32 {
    (CHAR_WIDTH * label.chars().count() as f64).ceil() as u32
}

/// Compute chip widths for a label.
///
/// An empty label still gets `2 * PADDING` on the right, so the total width
/// is never below `LEFT_WIDTH + 2 * PADDING`.
pub fn compute_layout(label: &str) -> Layout {
    let right_width = 2 * PADDING + text_width(label);
    Layout {
        left_width: LEFT_WIDTH,
        right_width,
        total_width: LEFT_WIDTH + right_width,
        height: HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_ai_generated() {
        let layout = compute_layout("AI Generated");
        assert_eq!(layout.right_width, 2 * PADDING + 84);
        assert_eq!(layout.total_width, LEFT_WIDTH + 2 * PADDING + 84);
        assert_eq!(layout.total_width, 148);
        assert_eq!(layout.height, 20);
    }

    #[test]
    fn test_layout_counts_characters_not_bytes() {
        // the en dash is three bytes but one character
        let layout = compute_layout("Human–AI Co-Created");
        assert_eq!(layout.right_width, 20 + 133);
        assert_eq!(layout.total_width, 197);
    }

    #[test]
    fn test_layout_empty_label() {
        let layout = compute_layout("");
        assert_eq!(layout.right_width, 2 * PADDING);
        assert_eq!(layout.total_width, LEFT_WIDTH + 2 * PADDING);
        assert!(layout.total_width > 0);
    }

    #[test]
    fn test_layout_scaled() {
        let layout = compute_layout("AI Drafted");
        assert_eq!(layout.scaled(1), [134, 20]);
        assert_eq!(layout.scaled(2), [268, 40]);
    }
}
