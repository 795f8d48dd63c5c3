//! Badge Pipeline - Single Entry Point
//!
//! label -> slug -> layout -> SVG -> PNG 1x/2x, then sprite and manifest over
//! every badge that made it. The catalog is always validated first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::thread;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::catalog::{BadgeSpec, Catalog};
use crate::hashing::{compute_input_hash, compute_manifest_hash, sha256_hex};
use crate::layout::compute_layout;
use crate::manifest::{build_manifest, Manifest};
use crate::output::{png_path, svg_path, OutputDir, OutputError, MANIFEST_PATH, SPRITE_PATH};
use crate::raster::{Backend, RasterAsset, RasterError, Rasterizer, Scale};
use crate::slug::Slug;
use crate::sprite::{build_sprite, SpriteError};
use crate::svg::{build_svg, SvgDocument};
use crate::validation::{ValidationResult, Validator, ViolationSeverity};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Catalog requires engine >= {required}, current is {current}")]
    EngineVersionMismatch { required: String, current: String },

    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Badge '{slug}' ({label}) failed: {source}")]
    Badge {
        label: String,
        slug: String,
        #[source]
        source: BadgeError,
    },

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Sprite(#[from] SpriteError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a single badge could not be produced.
#[derive(Debug, Error)]
pub enum BadgeError {
    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("render worker panicked")]
    Panicked,

    #[error("could not start render worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// What to do when one badge fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Stop at the first failed badge; no sprite, no manifest.
    #[default]
    Abort,
    /// Finish the other badges and leave the failed ones out.
    Continue,
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub failure_mode: FailureMode,
    /// Render threads at once. `None` uses the available parallelism.
    pub jobs: Option<usize>,
}

impl BuildOptions {
    fn worker_count(&self) -> usize {
        self.jobs
            .or_else(|| thread::available_parallelism().ok().map(|n| n.get()))
            .unwrap_or(1)
            .max(1)
    }
}

/// A badge rendered in memory, not yet written.
#[derive(Debug, Clone)]
pub struct CompiledBadge {
    pub svg: SvgDocument,
    pub rasters: Vec<RasterAsset>,
}

impl CompiledBadge {
    pub fn slug(&self) -> &Slug {
        self.svg.slug()
    }

    pub fn raster(&self, scale: Scale) -> Option<&RasterAsset> {
        self.rasters.iter().find(|r| r.scale == scale)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<Slug>,
    pub path: String,
    pub format: String,
    /// Pixel size; absent for files that are not a single badge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[u32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<Backend>,
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeFailure {
    pub label: String,
    pub slug: Slug,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub run_id: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub backend: Backend,
    pub input_hash: String,
    pub manifest_hash: String,
    pub manifest: Manifest,
    pub files: Vec<ExportedFile>,
    pub failures: Vec<BadgeFailure>,
}

impl BuildReport {
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The badge pipeline - single entry point for all badge builds
pub struct BadgePipeline {
    rasterizer: Rasterizer,
    validator: Validator,
    options: BuildOptions,
}

impl BadgePipeline {
    pub fn new(rasterizer: Rasterizer) -> Self {
        Self::with_options(rasterizer, BuildOptions::default())
    }

    pub fn with_options(rasterizer: Rasterizer, options: BuildOptions) -> Self {
        Self {
            rasterizer,
            validator: Validator::new(),
            options,
        }
    }

    pub fn backend(&self) -> Backend {
        self.rasterizer.backend()
    }

    /// Validate a catalog. This is the only validation entry point.
    pub fn validate_catalog(&self, catalog: &Catalog) -> Result<ValidationResult, PipelineError> {
        self.check_engine_version(catalog)?;
        Ok(self.validator.validate(catalog))
    }

    /// Render one badge in memory: SVG plus both raster scales.
    pub fn compile_badge(&self, spec: &BadgeSpec) -> Result<CompiledBadge, RasterError> {
        let layout = compute_layout(&spec.label);
        let svg = build_svg(&spec.label, &layout);
        debug!(
            "compiled {} ({}x{})",
            svg.slug(),
            layout.total_width,
            layout.height
        );

        let rasters = Scale::ALL
            .iter()
            .map(|&scale| self.rasterizer.export_png(&svg, scale))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledBadge { svg, rasters })
    }

    /// Build every badge in the catalog into `out`.
    ///
    /// Validation always runs first and blocks on errors. The previous
    /// manifest and sprite are removed before any badge is written, so a
    /// failed run never leaves a manifest naming half-replaced files.
    /// Badges render on a bounded pool of threads; results are consumed in
    /// catalog order, so output is identical however the threads finish.
    pub fn build(&self, catalog: &Catalog, out: &OutputDir) -> Result<BuildReport, PipelineError> {
        let validation = self.validate_catalog(catalog)?;
        if !validation.valid {
            return Err(PipelineError::ValidationFailed(validation.summary()));
        }
        for v in validation
            .violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Warning)
        {
            warn!("{}: {}", v.rule, v.message);
        }

        info!(
            "building {} badges into {} ({} renderer)",
            catalog.len(),
            out.root().display(),
            self.backend()
        );

        out.remove("manifest", MANIFEST_PATH)?;
        out.remove("sprite", SPRITE_PATH)?;

        let compiled = self.compile_all(catalog);

        let mut done: Vec<CompiledBadge> = Vec::with_capacity(catalog.len());
        let mut files = Vec::new();
        let mut failures = Vec::new();

        for (spec, result) in catalog.iter().zip(compiled) {
            let outcome = result.and_then(|badge| {
                let written = write_badge(out, &badge)?;
                Ok((badge, written))
            });

            match outcome {
                Ok((badge, written)) => {
                    files.extend(written);
                    done.push(badge);
                }
                Err(source) => {
                    let slug = spec.slug();
                    error!("badge {slug} failed: {source}");
                    match self.options.failure_mode {
                        FailureMode::Abort => {
                            return Err(PipelineError::Badge {
                                label: spec.label.clone(),
                                slug: slug.to_string(),
                                source,
                            });
                        }
                        FailureMode::Continue => failures.push(BadgeFailure {
                            label: spec.label.clone(),
                            slug,
                            error: source.to_string(),
                        }),
                    }
                }
            }
        }

        let sprite = build_sprite(done.iter().map(|b| (b.slug(), &b.svg)))?;
        out.write("sprite", SPRITE_PATH, sprite.markup().as_bytes())?;
        files.push(ExportedFile {
            slug: None,
            path: SPRITE_PATH.to_string(),
            format: "svg".to_string(),
            size: None,
            backend: None,
            hash: sha256_hex(sprite.markup().as_bytes()),
        });

        let manifest = build_manifest(done.iter().map(|b| (b.svg.label(), b.slug())));
        let manifest_json = manifest.to_json()?;
        out.write("manifest", MANIFEST_PATH, manifest_json.as_bytes())?;

        info!(
            "wrote {} badges, sprite and manifest ({} failed)",
            manifest.len(),
            failures.len()
        );

        Ok(BuildReport {
            run_id: Uuid::new_v4().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            backend: self.backend(),
            input_hash: compute_input_hash(catalog, ENGINE_VERSION, &self.backend().to_string())?,
            manifest_hash: compute_manifest_hash(&manifest)?,
            manifest,
            files,
            failures,
        })
    }

    fn compile_all(&self, catalog: &Catalog) -> Vec<Result<CompiledBadge, BadgeError>> {
        let specs: Vec<&BadgeSpec> = catalog.iter().collect();
        let jobs = self.options.worker_count();
        debug!("rendering {} badges on up to {} threads", specs.len(), jobs);

        thread::scope(|scope| {
            let mut results = Vec::with_capacity(specs.len());
            for batch in specs.chunks(jobs) {
                let workers: Vec<_> = batch
                    .iter()
                    .map(|&spec| {
                        thread::Builder::new()
                            .name(format!("badge-{}", spec.slug()))
                            .spawn_scoped(scope, move || self.compile_badge(spec))
                    })
                    .collect();

                results.extend(workers.into_iter().map(|worker| match worker {
                    Ok(handle) => match handle.join() {
                        Ok(result) => result.map_err(BadgeError::from),
                        Err(_) => Err(BadgeError::Panicked),
                    },
                    Err(e) => Err(BadgeError::Spawn(e)),
                }));
            }
            results
        })
    }

    fn check_engine_version(&self, catalog: &Catalog) -> Result<(), PipelineError> {
        let engine = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| PipelineError::InvalidVersion(ENGINE_VERSION.to_string()))?;
        let required = semver::Version::parse(&catalog.engine_min_version)
            .map_err(|_| PipelineError::InvalidVersion(catalog.engine_min_version.clone()))?;

        if engine < required {
            return Err(PipelineError::EngineVersionMismatch {
                required: catalog.engine_min_version.clone(),
                current: ENGINE_VERSION.to_string(),
            });
        }

        Ok(())
    }
}

fn write_badge(out: &OutputDir, badge: &CompiledBadge) -> Result<Vec<ExportedFile>, BadgeError> {
    let slug = badge.slug();
    let mut files = Vec::with_capacity(1 + badge.rasters.len());

    let svg_rel = svg_path(slug);
    out.write(slug.as_str(), &svg_rel, badge.svg.markup().as_bytes())?;
    files.push(ExportedFile {
        slug: Some(slug.clone()),
        path: svg_rel,
        format: "svg".to_string(),
        size: Some([badge.svg.width(), badge.svg.height()]),
        backend: None,
        hash: sha256_hex(badge.svg.markup().as_bytes()),
    });

    for raster in &badge.rasters {
        let rel = png_path(slug, raster.scale);
        out.write(slug.as_str(), &rel, &raster.bytes)?;
        files.push(ExportedFile {
            slug: Some(slug.clone()),
            path: rel,
            format: "png".to_string(),
            size: Some([raster.width_px, raster.height_px]),
            backend: Some(raster.backend),
            hash: sha256_hex(&raster.bytes),
        });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BackendPreference;

    fn pipeline() -> BadgePipeline {
        BadgePipeline::new(Rasterizer::probe(BackendPreference::Procedural).unwrap())
    }

    #[test]
    fn test_compile_badge_sizes() {
        let badge = pipeline()
            .compile_badge(&BadgeSpec::new("Human–AI Co-Created"))
            .unwrap();
        assert_eq!(badge.slug().as_str(), "human-ai-co-created");
        assert_eq!(badge.svg.width(), 197);

        let one = badge.raster(Scale::X1).unwrap();
        let two = badge.raster(Scale::X2).unwrap();
        assert_eq!((one.width_px, one.height_px), (197, 20));
        assert_eq!((two.width_px, two.height_px), (394, 40));
    }

    #[test]
    fn test_engine_version_gate() {
        let mut catalog = Catalog::default();
        catalog.engine_min_version = "99.0.0".to_string();
        let err = pipeline().validate_catalog(&catalog).unwrap_err();
        assert!(matches!(err, PipelineError::EngineVersionMismatch { .. }));

        catalog.engine_min_version = "not-a-version".to_string();
        let err = pipeline().validate_catalog(&catalog).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidVersion(_)));
    }

    #[test]
    fn test_bounded_workers_keep_catalog_order() {
        let catalog = Catalog::default();
        for jobs in [1, 2, 64] {
            let pipeline = BadgePipeline::with_options(
                Rasterizer::probe(BackendPreference::Procedural).unwrap(),
                BuildOptions {
                    jobs: Some(jobs),
                    ..BuildOptions::default()
                },
            );
            let slugs: Vec<_> = pipeline
                .compile_all(&catalog)
                .into_iter()
                .map(|r| r.unwrap().slug().to_string())
                .collect();
            let expected: Vec<_> = catalog.iter().map(|b| b.slug().to_string()).collect();
            assert_eq!(slugs, expected, "jobs = {jobs}");
        }
    }

    #[test]
    fn test_worker_count_never_zero() {
        let options = BuildOptions {
            jobs: Some(0),
            ..BuildOptions::default()
        };
        assert_eq!(options.worker_count(), 1);
        assert!(BuildOptions::default().worker_count() >= 1);
    }

    #[test]
    fn test_sprite_entry_has_no_size() {
        let dir = tempfile::tempdir().unwrap();
        let report = pipeline()
            .build(
                &Catalog::from_labels(["AI Drafted"]),
                &OutputDir::new(dir.path()),
            )
            .unwrap();

        let sprite = report.files.iter().find(|f| f.path == SPRITE_PATH).unwrap();
        assert_eq!(sprite.size, None);
        let json = serde_json::to_value(sprite).unwrap();
        assert!(json.get("size").is_none());

        let png = report
            .files
            .iter()
            .find(|f| f.path == "badges/png/2x/ai-drafted.png")
            .unwrap();
        assert_eq!(png.size, Some([268, 40]));
    }

    #[test]
    fn test_failure_mode_serde() {
        assert_eq!(serde_json::to_string(&FailureMode::Continue).unwrap(), r#""continue""#);
        assert_eq!(FailureMode::default(), FailureMode::Abort);
    }
}
