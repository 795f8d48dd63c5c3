//! Sprite Composer - one SVG of reusable symbols
//!
//! Consumers reference `sprites/sprite.svg#<slug>` with `<use>`.

use std::collections::HashSet;
use thiserror::Error;

use crate::slug::Slug;
use crate::svg::{SvgDocument, SVG_NS};

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("Duplicate sprite symbol id: {0}")]
    DuplicateSymbol(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteDocument {
    ids: Vec<Slug>,
    markup: String,
}

impl SpriteDocument {
    /// Symbol ids in document order.
    pub fn ids(&self) -> &[Slug] {
        &self.ids
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// Wrap each badge body in a `<symbol>` keyed by its slug.
///
/// Symbols keep the badge viewBox and size so each one scales on its own.
/// Order follows `entries`; a repeated slug is an error.
pub fn build_sprite<'a, I>(entries: I) -> Result<SpriteDocument, SpriteError>
where
    I: IntoIterator<Item = (&'a Slug, &'a SvgDocument)>,
{
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    // never display:none, or <use> loses the symbols' gradients and clips
    let mut markup = format!("<svg xmlns=\"{SVG_NS}\" aria-hidden=\"true\">\n");

    for (slug, doc) in entries {
        if !seen.insert(slug.as_str()) {
            return Err(SpriteError::DuplicateSymbol(slug.to_string()));
        }
        markup.push_str(&format!(
            r#"  <symbol id="{slug}" viewBox="{vb}" width="{w}" height="{h}">"#,
            vb = doc.view_box(),
            w = doc.width(),
            h = doc.height(),
        ));
        markup.push('\n');
        for line in doc.body().lines() {
            markup.push_str("  ");
            markup.push_str(line);
            markup.push('\n');
        }
        markup.push_str("  </symbol>\n");
        ids.push(slug.clone());
    }

    markup.push_str("</svg>\n");
    Ok(SpriteDocument { ids, markup })
}
