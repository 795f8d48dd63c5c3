//! Badge Catalog - the ordered list of disclosure levels
//!
//! The catalog is plain configuration handed to the pipeline. Nothing in the
//! engine keeps its own copy of the category list.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::slug::{slugify, Slug};

/// Disclosure levels, least to most AI involvement.
pub const DEFAULT_LABELS: [&str; 9] = [
    "Human Original",
    "Human Original • AI Polished",
    "Human Written • AI Reviewed",
    "AI Suggested • Human Approved",
    "Human Curated",
    "Human–AI Co-Created",
    "AI Drafted • Human Edited",
    "AI Drafted",
    "AI Generated",
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeSpec {
    pub label: String,
}

impl BadgeSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn slug(&self) -> Slug {
        slugify(&self.label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default = "default_version")]
    pub catalog_version: String,
    #[serde(default = "default_version")]
    pub engine_min_version: String,
    pub badges: Vec<BadgeSpec>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Catalog {
    pub fn new(badges: Vec<BadgeSpec>) -> Self {
        Self {
            catalog_version: default_version(),
            engine_min_version: default_version(),
            badges,
        }
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(labels.into_iter().map(BadgeSpec::new).collect())
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Catalog from `path`, or the built-in one when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BadgeSpec> {
        self.badges.iter()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&BadgeSpec> {
        self.badges.iter().find(|b| b.slug().as_str() == slug)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_labels(DEFAULT_LABELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_catalog_order() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.badges[0].label, "Human Original");
        assert_eq!(catalog.badges[5].label, "Human–AI Co-Created");
        assert_eq!(catalog.badges[8].label, "AI Generated");
    }

    #[test]
    fn test_load_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"badges": [{{"label": "AI Drafted"}}, {{"label": "AI Generated"}}]}}"#)
            .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.engine_min_version, "1.0.0");
        assert!(catalog.find_by_slug("ai-generated").is_some());
    }

    #[test]
    fn test_load_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Catalog::load(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
