//! SVG Composer - the badge master
//!
//! The SVG is the source of truth. Raster exports and sprite symbols are
//! derived from it, never edited independently.

use crate::layout::{Layout, CORNER_RADIUS};
use crate::palette::{
    AI_TEXT, DIVIDER_OPACITY, FONT_FAMILY, GRADIENT_END, GRADIENT_START, OUTLINE_OPACITY,
    RIGHT_FILL, RIGHT_FILL_TOP, RIGHT_TEXT, SPARKLE, WHITE,
};
use crate::slug::{slugify, Slug};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Text baseline for a 20px badge.
pub const BASELINE: f32 = 14.0;
pub const FONT_SIZE: u32 = 11;

/// Outline of the sparkle glyph, in its own 16x16 design space.
pub const SPARKLE_POINTS: [(f32, f32); 8] = [
    (9.0, 2.0),
    (10.1, 5.4),
    (13.5, 6.0),
    (10.1, 7.6),
    (9.0, 11.0),
    (7.9, 7.6),
    (4.5, 6.0),
    (7.9, 5.4),
];
/// Placement of the sparkle inside the left chip.
pub const SPARKLE_OFFSET: (f32, f32) = (8.0, 5.0);
pub const SPARKLE_SCALE: f32 = 0.6;

/// Horizontal center of the "AI" text, nudged right of the chip center to
/// clear the sparkle.
pub fn ai_text_center(layout: &Layout) -> f32 {
    layout.left_width as f32 / 2.0 + 4.0
}

/// Horizontal center of the label text.
pub fn label_center(layout: &Layout) -> f32 {
    layout.left_width as f32 + layout.right_width as f32 / 2.0
}

/// A finished badge document.
///
/// Immutable once built. `body` is everything between the `<svg>` root tags,
/// which is what the sprite wraps into a `<symbol>`.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    label: String,
    slug: Slug,
    layout: Layout,
    body: String,
    markup: String,
}

impl SvgDocument {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn width(&self) -> u32 {
        self.layout.total_width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width(), self.height())
    }
}

/// Compose the badge SVG for a label and its layout.
pub fn build_svg(label: &str, layout: &Layout) -> SvgDocument {
    let slug = slugify(label);
    let body = build_body(label, &slug, layout);
    let escaped = escape_xml(label);

    let mut markup = String::with_capacity(body.len() + 256);
    markup.push_str(&format!(
        r#"<svg xmlns="{SVG_NS}" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{escaped}">"#,
        w = layout.total_width,
        h = layout.height,
    ));
    markup.push('\n');
    markup.push_str(&body);
    markup.push_str("</svg>\n");

    SvgDocument {
        label: label.to_string(),
        slug,
        layout: *layout,
        body,
        markup,
    }
}

fn build_body(label: &str, slug: &Slug, layout: &Layout) -> String {
    let w = layout.total_width;
    let h = layout.height;
    let lw = layout.left_width;
    let rw = layout.right_width;
    let r = CORNER_RADIUS;
    let escaped = escape_xml(label);

    // Ids carry the slug so symbols merged into one sprite never collide.
    let defs = format!(
        r##"  <defs>
    <clipPath id="clip-{slug}"><rect width="{w}" height="{h}" rx="{r}"/></clipPath>
    <clipPath id="clip-label-{slug}"><rect x="{lw}" width="{rw}" height="{h}"/></clipPath>
    <linearGradient id="grad-ai-{slug}" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="{GRADIENT_START}"/>
      <stop offset="100%" stop-color="{GRADIENT_END}"/>
    </linearGradient>
    <linearGradient id="grad-label-{slug}" x1="0%" y1="0%" x2="0%" y2="100%">
      <stop offset="0%" stop-color="{RIGHT_FILL_TOP}"/>
      <stop offset="100%" stop-color="{RIGHT_FILL}"/>
    </linearGradient>
  </defs>
"##
    );

    let chips = format!(
        r##"  <g clip-path="url(#clip-{slug})">
    <rect width="{lw}" height="{h}" fill="url(#grad-ai-{slug})"/>
    <rect x="{lw}" width="{rw}" height="{h}" fill="url(#grad-label-{slug})"/>
    <path d="M {lw} 1.5 V {y2}" stroke="{WHITE}" stroke-opacity="{DIVIDER_OPACITY}" stroke-width="1"/>
  </g>
  <rect x="0.5" y="0.5" width="{ow}" height="{oh}" rx="{or}" fill="none" stroke="{WHITE}" stroke-opacity="{OUTLINE_OPACITY}" stroke-width="1"/>
"##,
        y2 = h as f32 - 1.5,
        ow = w - 1,
        oh = h - 1,
        or = r as f32 - 0.5,
    );

    let sparkle = format!(
        r#"  <path d="{d}" fill="{SPARKLE}" transform="translate({tx} {ty}) scale({SPARKLE_SCALE})"/>
"#,
        d = sparkle_path_data(),
        tx = SPARKLE_OFFSET.0,
        ty = SPARKLE_OFFSET.1,
    );

    let text = format!(
        r##"  <g shape-rendering="crispEdges" text-rendering="optimizeLegibility" font-family="{FONT_FAMILY}" font-size="{FONT_SIZE}">
    <text x="{ai_x:.1}" y="{BASELINE}" text-anchor="middle" fill="{AI_TEXT}" font-weight="600">AI</text>
    <text x="{label_x:.1}" y="{BASELINE}" text-anchor="middle" fill="{RIGHT_TEXT}" font-weight="500" clip-path="url(#clip-label-{slug})">{escaped}</text>
  </g>
"##,
        ai_x = ai_text_center(layout),
        label_x = label_center(layout),
    );

    let mut out = format!("  <title>{escaped}</title>\n");
    out.push_str(&defs);
    out.push_str(&chips);
    out.push_str(&sparkle);
    out.push_str(&text);
    out
}

fn sparkle_path_data() -> String {
    let mut d: String = SPARKLE_POINTS
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            let cmd = if i == 0 { 'M' } else { 'L' };
            format!("{cmd}{x} {y} ")
        })
        .collect();
    d.push('Z');
    d
}

/// Escape text for use in element content and quoted attributes.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;

    fn doc(label: &str) -> SvgDocument {
        build_svg(label, &compute_layout(label))
    }

    #[test]
    fn test_root_dimensions_match_layout() {
        let d = doc("Human–AI Co-Created");
        assert_eq!(d.width(), 197);
        assert_eq!(d.height(), 20);
        assert!(d.markup().starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="197" height="20" viewBox="0 0 197 20""#));
        assert!(d.markup().trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_contains_required_parts() {
        let d = doc("AI Drafted");
        let m = d.markup();
        assert!(m.contains(r#"<clipPath id="clip-ai-drafted">"#));
        assert!(m.contains(r#"rx="3""#));
        assert!(m.contains(r##"id="grad-ai-ai-drafted""##));
        assert!(m.contains(r##"stop-color="#7B5CF9""##));
        assert!(m.contains(r##"stop-color="#E549FF""##));
        assert!(m.contains(r##"id="grad-label-ai-drafted""##));
        assert!(m.contains(r#"shape-rendering="crispEdges""#));
        assert!(m.contains(">AI</text>"));
        assert!(m.contains(">AI Drafted</text>"));
        assert!(m.contains(r#"clip-path="url(#clip-label-ai-drafted)""#));
        assert!(m.contains("<title>AI Drafted</title>"));
    }

    #[test]
    fn test_label_is_centered_in_right_chip() {
        let d = doc("AI Generated");
        // 44 + 104 / 2
        assert!(d.markup().contains(r#"<text x="96.0" y="14" text-anchor="middle""#));
    }

    #[test]
    fn test_self_contained() {
        let d = doc("Human Curated");
        assert!(!d.markup().contains("href"));
        // the namespace declaration is the only URL
        assert_eq!(d.markup().matches("http://").count(), 1);
    }

    #[test]
    fn test_label_escaped() {
        let d = doc("R&D <Lab>");
        assert!(d.markup().contains("R&amp;D &lt;Lab&gt;"));
        assert!(!d.markup().contains("R&D"));
    }

    #[test]
    fn test_body_excludes_root() {
        let d = doc("AI Drafted");
        assert!(!d.body().contains("<svg"));
        assert!(!d.body().contains("</svg>"));
        assert!(d.markup().contains(d.body()));
    }

    #[test]
    fn test_chip_group_markup() {
        let d = doc("AI Drafted");
        assert!(d.body().starts_with("  <title>AI Drafted</title>\n  <defs>\n"));
        assert!(d.body().contains(
            r##"  <g clip-path="url(#clip-ai-drafted)">
    <rect width="44" height="20" fill="url(#grad-ai-ai-drafted)"/>
    <rect x="44" width="90" height="20" fill="url(#grad-label-ai-drafted)"/>
    <path d="M 44 1.5 V 18.5" stroke="#FFFFFF" stroke-opacity="0.08" stroke-width="1"/>
  </g>
  <rect x="0.5" y="0.5" width="133" height="19" rx="2.5" fill="none" stroke="#FFFFFF" stroke-opacity="0.18" stroke-width="1"/>
"##
        ));
        assert!(d.body().ends_with("  </g>\n"));
        assert_eq!(d.markup().lines().count(), d.body().lines().count() + 2);
    }

    #[test]
    fn test_sparkle_path() {
        assert_eq!(
            sparkle_path_data(),
            "M9 2 L10.1 5.4 L13.5 6 L10.1 7.6 L9 11 L7.9 7.6 L4.5 6 L7.9 5.4 Z"
        );
    }
}
