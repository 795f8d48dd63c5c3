//! Output layout and file writing
//!
//! Relative paths are part of the contract with downstream tooling and always
//! use forward slashes, whatever the host platform.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::raster::Scale;
use crate::slug::Slug;

pub const MANIFEST_PATH: &str = "badges/index.json";
pub const SPRITE_PATH: &str = "sprites/sprite.svg";

#[derive(Debug, Error)]
#[error("Failed to write {path} for '{slug}': {source}")]
pub struct OutputError {
    pub slug: String,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

pub fn svg_path(slug: &Slug) -> String {
    format!("badges/svg/{slug}.svg")
}

pub fn png_path(slug: &Slug, scale: Scale) -> String {
    format!("badges/png/{}/{slug}.png", scale.dir_name())
}

/// Writes build artifacts below one root directory.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    /// Write `bytes` to `relative`, creating parent directories. `owner`
    /// names the badge (or "manifest"/"sprite") in the error.
    pub fn write(&self, owner: &str, relative: &str, bytes: &[u8]) -> Result<PathBuf, OutputError> {
        let path = self.resolve(relative);
        let fail = |source| OutputError {
            slug: owner.to_string(),
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(fail)?;
        }
        fs::write(&path, bytes).map_err(fail)?;
        Ok(path)
    }

    /// Delete `relative` if it exists. A missing file is not an error.
    pub fn remove(&self, owner: &str, relative: &str) -> Result<(), OutputError> {
        let path = self.resolve(relative);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(OutputError {
                slug: owner.to_string(),
                path,
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slug::slugify;
    use tempfile::tempdir;

    #[test]
    fn test_relative_paths() {
        let slug = slugify("Human–AI Co-Created");
        assert_eq!(svg_path(&slug), "badges/svg/human-ai-co-created.svg");
        assert_eq!(png_path(&slug, Scale::X1), "badges/png/1x/human-ai-co-created.png");
        assert_eq!(png_path(&slug, Scale::X2), "badges/png/2x/human-ai-co-created.png");
    }

    #[test]
    fn test_write_creates_parents() {
        let dir = tempdir().unwrap();
        let out = OutputDir::new(dir.path());

        let path = out.write("ai-drafted", "badges/svg/ai-drafted.svg", b"<svg/>").unwrap();
        assert_eq!(path, dir.path().join("badges").join("svg").join("ai-drafted.svg"));
        assert_eq!(fs::read(&path).unwrap(), b"<svg/>");
    }

    #[test]
    fn test_remove_existing_and_missing() {
        let dir = tempdir().unwrap();
        let out = OutputDir::new(dir.path());
        let path = out.write("manifest", MANIFEST_PATH, b"[]").unwrap();

        out.remove("manifest", MANIFEST_PATH).unwrap();
        assert!(!path.exists());
        out.remove("manifest", MANIFEST_PATH).unwrap();
        out.remove("sprite", SPRITE_PATH).unwrap();
    }

    #[test]
    fn test_write_error_names_slug() {
        let dir = tempdir().unwrap();
        // a regular file where a directory is needed
        fs::write(dir.path().join("badges"), b"").unwrap();
        let out = OutputDir::new(dir.path());

        let err = out.write("ai-drafted", "badges/svg/ai-drafted.svg", b"x").unwrap_err();
        assert_eq!(err.slug, "ai-drafted");
        assert!(err.to_string().contains("ai-drafted"));
    }
}
