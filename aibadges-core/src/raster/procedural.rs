//! Procedural renderer - rebuilds the badge without an SVG engine
//!
//! Same geometry as the SVG master: rounded outline, chip gradients, divider,
//! sparkle and centered text. Text is set in the built-in 5x7 bitmap font, so
//! glyph shapes differ from the vector output while positions do not.

use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Mask, Paint, Path, PathBuilder, Pixmap, Point,
    Rect, SpreadMode, Stroke, Transform,
};

use super::font::{self, ADVANCE, GLYPH_HEIGHT};
use super::{Backend, RasterError, Renderer, Scale};
use crate::layout::CORNER_RADIUS;
use crate::palette::{
    Rgb, AI_TEXT, DIVIDER_OPACITY, GRADIENT_END, GRADIENT_START, OUTLINE_OPACITY, RIGHT_FILL,
    RIGHT_FILL_TOP, RIGHT_TEXT, SPARKLE, WHITE,
};
use crate::svg::{
    ai_text_center, label_center, SvgDocument, BASELINE, SPARKLE_OFFSET, SPARKLE_POINTS,
    SPARKLE_SCALE,
};

/// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralRenderer;

impl Renderer for ProceduralRenderer {
    fn backend(&self) -> Backend {
        Backend::Procedural
    }

    fn render(&self, doc: &SvgDocument, scale: Scale) -> Result<Pixmap, RasterError> {
        let layout = doc.layout();
        let [width, height] = layout.scaled(scale.factor());
        let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::Canvas(width, height))?;
        let degenerate = || RasterError::Geometry(doc.slug().to_string());

        let s = scale.factor() as f32;
        let w = width as f32;
        let h = height as f32;
        let left = layout.left_width as f32 * s;
        let right = layout.right_width as f32 * s;
        let radius = CORNER_RADIUS as f32 * s;

        let outline = rounded_rect(0.0, 0.0, w, h, radius).ok_or_else(degenerate)?;
        let mut clip = Mask::new(width, height).ok_or(RasterError::Canvas(width, height))?;
        clip.fill_path(&outline, FillRule::Winding, true, Transform::identity());

        let left_chip = Rect::from_xywh(0.0, 0.0, left, h).ok_or_else(degenerate)?;
        let paint = gradient(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(left, h),
            GRADIENT_START,
            GRADIENT_END,
        )
        .ok_or_else(degenerate)?;
        pixmap.fill_rect(left_chip, &paint, Transform::identity(), Some(&clip));

        let right_chip = Rect::from_xywh(left, 0.0, right, h).ok_or_else(degenerate)?;
        let paint = gradient(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(0.0, h),
            RIGHT_FILL_TOP,
            RIGHT_FILL,
        )
        .ok_or_else(degenerate)?;
        pixmap.fill_rect(right_chip, &paint, Transform::identity(), Some(&clip));

        // one-unit vertical stroke centered on the chip boundary, as in the SVG
        let stroke = Stroke {
            width: s,
            ..Stroke::default()
        };
        let divider = divider_path(left, 1.5 * s, h - 1.5 * s).ok_or_else(degenerate)?;
        pixmap.stroke_path(
            &divider,
            &solid(WHITE, DIVIDER_OPACITY),
            &stroke,
            Transform::identity(),
            Some(&clip),
        );

        let inset = s / 2.0;
        let border = rounded_rect(inset, inset, w - s, h - s, radius - inset)
            .ok_or_else(degenerate)?;
        pixmap.stroke_path(
            &border,
            &solid(WHITE, OUTLINE_OPACITY),
            &stroke,
            Transform::identity(),
            None,
        );

        let sparkle = sparkle_path(s).ok_or_else(degenerate)?;
        pixmap.fill_path(
            &sparkle,
            &solid(SPARKLE, 1.0),
            FillRule::Winding,
            Transform::identity(),
            None,
        );

        let baseline = BASELINE * s;
        draw_text(
            &mut pixmap,
            "AI",
            ai_text_center(layout) * s,
            baseline,
            s,
            AI_TEXT,
            true,
            None,
        );

        let mut label_clip = Mask::new(width, height).ok_or(RasterError::Canvas(width, height))?;
        label_clip.fill_path(
            &PathBuilder::from_rect(right_chip),
            FillRule::Winding,
            false,
            Transform::identity(),
        );
        draw_text(
            &mut pixmap,
            doc.label(),
            label_center(layout) * s,
            baseline,
            s,
            RIGHT_TEXT,
            false,
            Some(&label_clip),
        );

        Ok(pixmap)
    }
}

fn color(rgb: Rgb, opacity: f32) -> Color {
    Color::from_rgba8(rgb.0, rgb.1, rgb.2, (opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn solid(rgb: Rgb, opacity: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgb, opacity));
    paint.anti_alias = true;
    paint
}

fn gradient(start: Point, end: Point, from: Rgb, to: Rgb) -> Option<Paint<'static>> {
    let shader = LinearGradient::new(
        start,
        end,
        vec![
            GradientStop::new(0.0, color(from, 1.0)),
            GradientStop::new(1.0, color(to, 1.0)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )?;
    Some(Paint {
        shader,
        anti_alias: true,
        ..Paint::default()
    })
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<Path> {
    let r = r.max(0.0).min(w / 2.0).min(h / 2.0);
    let k = r * (1.0 - KAPPA);
    let (x1, y1) = (x + w, y + h);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x1 - r, y);
    pb.cubic_to(x1 - k, y, x1, y + k, x1, y + r);
    pb.line_to(x1, y1 - r);
    pb.cubic_to(x1, y1 - k, x1 - k, y1, x1 - r, y1);
    pb.line_to(x + r, y1);
    pb.cubic_to(x + k, y1, x, y1 - k, x, y1 - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + k, x + k, y, x + r, y);
    pb.close();
    pb.finish()
}

fn divider_path(x: f32, top: f32, bottom: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(x, top);
    pb.line_to(x, bottom);
    pb.finish()
}

fn sparkle_path(s: f32) -> Option<Path> {
    let place = |(px, py): (f32, f32)| {
        (
            (SPARKLE_OFFSET.0 + px * SPARKLE_SCALE) * s,
            (SPARKLE_OFFSET.1 + py * SPARKLE_SCALE) * s,
        )
    };

    let mut pb = PathBuilder::new();
    for (i, point) in SPARKLE_POINTS.iter().enumerate() {
        let (x, y) = place(*point);
        if i == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    pb.close();
    pb.finish()
}

/// Set `text` centered on `center_x` with its baseline at `baseline`.
/// Each font pixel becomes a `cell`-sized square. Bold widens every stroke
/// by one cell.
#[allow(clippy::too_many_arguments)]
fn draw_text(
    pixmap: &mut Pixmap,
    text: &str,
    center_x: f32,
    baseline: f32,
    cell: f32,
    rgb: Rgb,
    bold: bool,
    mask: Option<&Mask>,
) {
    let mut paint = solid(rgb, 1.0);
    paint.anti_alias = false;

    let advance = if bold { ADVANCE + 1 } else { ADVANCE };
    let stroke_width = if bold { 2.0 * cell } else { cell };
    let run = font::text_width(text, advance) as f32 * cell;
    let top = baseline - GLYPH_HEIGHT as f32 * cell;
    let mut x = (center_x - run / 2.0).round();

    for ch in text.chars() {
        for (col, bits) in font::glyph(ch).into_iter().enumerate() {
            for row in 0..GLYPH_HEIGHT {
                if (bits >> row) & 1 == 0 {
                    continue;
                }
                let px = x + col as f32 * cell;
                let py = top + row as f32 * cell;
                if let Some(r) = Rect::from_xywh(px, py, stroke_width, cell) {
                    pixmap.fill_rect(r, &paint, Transform::identity(), mask);
                }
            }
        }
        x += advance as f32 * cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::svg::build_svg;

    fn render(label: &str, scale: Scale) -> Pixmap {
        let doc = build_svg(label, &compute_layout(label));
        ProceduralRenderer.render(&doc, scale).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let one = render("Human–AI Co-Created", Scale::X1);
        let two = render("Human–AI Co-Created", Scale::X2);
        assert_eq!((one.width(), one.height()), (197, 20));
        assert_eq!((two.width(), two.height()), (394, 40));
    }

    #[test]
    fn test_every_catalog_badge_renders_at_both_scales() {
        for label in crate::catalog::DEFAULT_LABELS {
            for scale in Scale::ALL {
                let pixmap = render(label, scale);
                let [w, h] = compute_layout(label).scaled(scale.factor());
                assert_eq!((pixmap.width(), pixmap.height()), (w, h), "{label} at {scale:?}");
            }
        }
    }

    #[test]
    fn test_divider_lightens_chip_boundary() {
        let layout = compute_layout("AI Drafted");
        for scale in Scale::ALL {
            let s = scale.factor();
            let pixmap = render("AI Drafted", scale);
            let y = 10 * s;
            // first right-chip pixel under the stroke vs. a few pixels further in
            let on = pixmap.pixel(layout.left_width * s, y).unwrap().demultiply();
            let off = pixmap.pixel((layout.left_width + 3) * s, y).unwrap().demultiply();
            assert!(on.red() > off.red(), "no divider at {scale:?}");
        }
    }

    #[test]
    fn test_rounded_corners_are_transparent() {
        let pixmap = render("AI Drafted", Scale::X1);
        let corner = pixmap.pixel(0, 0).unwrap();
        assert!(corner.alpha() < 200);
        let far = pixmap.pixel(pixmap.width() - 1, pixmap.height() - 1).unwrap();
        assert!(far.alpha() < 200);
    }

    #[test]
    fn test_chip_colors() {
        let pixmap = render("AI Drafted", Scale::X1);

        let chip = pixmap.pixel(6, 17).unwrap().demultiply();
        assert_eq!(chip.alpha(), 255);
        assert!(chip.blue() > chip.green());
        assert!(chip.red() > 100);

        let body = pixmap.pixel(pixmap.width() - 8, 17).unwrap().demultiply();
        assert_eq!(body.alpha(), 255);
        assert!(body.red() < 60 && body.green() < 60 && body.blue() < 80);
    }

    #[test]
    fn test_label_text_drawn_in_right_chip() {
        let pixmap = render("AI Drafted", Scale::X1);
        let layout = compute_layout("AI Drafted");

        let lit = (layout.left_width + 2..layout.total_width - 2)
            .flat_map(|x| (7..14).map(move |y| (x, y)))
            .filter_map(|(x, y)| pixmap.pixel(x, y))
            .map(|px| px.demultiply())
            .any(|c| c.red() > 200 && c.green() > 200 && c.blue() > 200);
        assert!(lit);
    }

    #[test]
    fn test_text_is_clipped_to_right_chip() {
        // far more text than the layout allots; the overflow must not reach
        // into the AI chip between the "AI" text and the divider
        let label = "W".repeat(12);
        let doc = build_svg(&label, &compute_layout("W"));
        let pixmap = ProceduralRenderer.render(&doc, Scale::X1).unwrap();
        for x in 34..43 {
            for y in 7..14 {
                let px = pixmap.pixel(x, y).unwrap().demultiply();
                assert!(px.green() < 200, "label text leaked at ({x}, {y})");
            }
        }
    }
}
