//! Manifest - the authoritative list of generated badges
//!
//! Serialized to `badges/index.json` as a plain ordered array.

use serde::{Deserialize, Serialize};

use crate::output::{png_path, svg_path};
use crate::raster::Scale;
use crate::slug::Slug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub label: String,
    pub slug: Slug,
    pub svg: String,
    pub png1x: String,
    pub png2x: String,
}

impl ManifestEntry {
    pub fn new(label: &str, slug: &Slug) -> Self {
        Self {
            label: label.to_string(),
            slug: slug.clone(),
            svg: svg_path(slug),
            png1x: png_path(slug, Scale::X1),
            png2x: png_path(slug, Scale::X2),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.slug.as_str() == slug)
    }

    pub fn find_by_label(&self, label: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// One entry per `(label, slug)`, in the order given.
pub fn build_manifest<'a, I>(badges: I) -> Manifest
where
    I: IntoIterator<Item = (&'a str, &'a Slug)>,
{
    Manifest {
        entries: badges
            .into_iter()
            .map(|(label, slug)| ManifestEntry::new(label, slug))
            .collect(),
    }
}
