//! Slugs - filesystem and URL safe badge identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier derived from a badge label.
///
/// Used as the filename stem of every exported file and as the symbol id
/// inside the sprite. Only ever contains `[a-z0-9-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every character is a lowercase ASCII letter, digit or hyphen.
    pub fn is_well_formed(&self) -> bool {
        self.0
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the slug for a label.
///
/// Dashes, bullets and slashes become hyphens, any other run of characters
/// outside `[a-z0-9]` collapses into a single hyphen, and the result is
/// trimmed of leading and trailing hyphens. Empty input yields an empty slug.
pub fn slugify(label: &str) -> Slug {
    let mut out = String::with_capacity(label.len());
    let mut pending_dash = false;

    for ch in label.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            out.push(ch);
            pending_dash = false;
        } else {
            // hyphens, en/em dashes, bullets, slashes and spaces alike
            pending_dash = true;
        }
    }

    Slug(out)
}
