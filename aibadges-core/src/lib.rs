//! AI Disclosure Badges - badge compiler
//!
//! One pass turns the catalog of disclosure levels into:
//! 1. `badges/svg/<slug>.svg` (the master)
//! 2. `badges/png/1x|2x/<slug>.png`
//! 3. `sprites/sprite.svg` (one `<symbol>` per slug)
//! 4. `badges/index.json` (the manifest)

pub mod catalog;
pub mod hashing;
pub mod layout;
pub mod manifest;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod raster;
pub mod slug;
pub mod sprite;
pub mod svg;
pub mod validation;

pub use catalog::{BadgeSpec, Catalog, DEFAULT_LABELS};
pub use layout::{compute_layout, Layout};
pub use manifest::{build_manifest, Manifest, ManifestEntry};
pub use output::OutputDir;
pub use pipeline::{BadgePipeline, BuildOptions, BuildReport, CompiledBadge, FailureMode, PipelineError};
pub use raster::{Backend, BackendPreference, RasterAsset, Rasterizer, Renderer, Scale};
pub use slug::{slugify, Slug};
pub use sprite::{build_sprite, SpriteDocument};
pub use svg::{build_svg, SvgDocument};
pub use validation::{ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
