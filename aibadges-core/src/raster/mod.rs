//! Raster Exporter - SVG master to PNG
//!
//! Two renderers reach the same picture: the vector renderer draws the SVG
//! itself, the procedural renderer rebuilds the same geometry with paths and
//! a bitmap font. [`Rasterizer::probe`] picks one once at startup.

mod font;
pub mod procedural;
#[cfg(feature = "vector")]
pub mod vector;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tiny_skia::Pixmap;
use tracing::{debug, info, warn};

use crate::svg::SvgDocument;

pub use procedural::ProceduralRenderer;
#[cfg(feature = "vector")]
pub use vector::{fontdb, VectorRenderer};

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Rasterization backend unavailable: {0}")]
    BackendUnavailable(Backend),

    #[error("SVG parse error for '{slug}': {message}")]
    Parse { slug: String, message: String },

    #[error("Cannot allocate a {0}x{1} canvas")]
    Canvas(u32, u32),

    #[error("Degenerate badge geometry for '{0}'")]
    Geometry(String),

    #[error("Rendered {actual:?} for '{slug}', expected {expected:?}")]
    SizeMismatch {
        slug: String,
        expected: [u32; 2],
        actual: [u32; 2],
    },

    #[error("Unsupported scale: {0}")]
    UnsupportedScale(u32),

    #[error("PNG encoding error: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Raster density relative to the 1x badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Scale {
    X1,
    X2,
}

impl Scale {
    pub const ALL: [Scale; 2] = [Scale::X1, Scale::X2];

    pub fn factor(self) -> u32 {
        match self {
            Scale::X1 => 1,
            Scale::X2 => 2,
        }
    }

    /// Directory name under `badges/png/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            Scale::X1 => "1x",
            Scale::X2 => "2x",
        }
    }
}

impl TryFrom<u32> for Scale {
    type Error = RasterError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Scale::X1),
            2 => Ok(Scale::X2),
            other => Err(RasterError::UnsupportedScale(other)),
        }
    }
}

impl From<Scale> for u32 {
    fn from(scale: Scale) -> Self {
        scale.factor()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Vector,
    Procedural,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Vector => f.write_str("vector"),
            Backend::Procedural => f.write_str("procedural"),
        }
    }
}

/// Which renderer the probe may pick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    #[default]
    Auto,
    Vector,
    Procedural,
}

impl FromStr for BackendPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "vector" => Ok(Self::Vector),
            "procedural" => Ok(Self::Procedural),
            other => Err(format!("unknown backend '{other}' (expected auto, vector or procedural)")),
        }
    }
}

/// One PNG export of a badge.
#[derive(Debug, Clone)]
pub struct RasterAsset {
    pub scale: Scale,
    pub width_px: u32,
    pub height_px: u32,
    pub backend: Backend,
    pub bytes: Vec<u8>,
}

/// Renderer trait - draws a badge document into a pixmap
pub trait Renderer: Send + Sync {
    fn backend(&self) -> Backend;

    /// Render at `scale`. The pixmap must be exactly `layout.scaled(scale)`.
    fn render(&self, doc: &SvgDocument, scale: Scale) -> Result<Pixmap, RasterError>;
}

/// Render with one specific renderer and encode as PNG.
pub fn export_png(
    renderer: &dyn Renderer,
    doc: &SvgDocument,
    scale: Scale,
) -> Result<RasterAsset, RasterError> {
    let pixmap = renderer.render(doc, scale)?;
    finish(doc, scale, renderer.backend(), &pixmap)
}

fn finish(
    doc: &SvgDocument,
    scale: Scale,
    backend: Backend,
    pixmap: &Pixmap,
) -> Result<RasterAsset, RasterError> {
    let expected = doc.layout().scaled(scale.factor());
    let actual = [pixmap.width(), pixmap.height()];
    if expected != actual {
        return Err(RasterError::SizeMismatch {
            slug: doc.slug().to_string(),
            expected,
            actual,
        });
    }

    Ok(RasterAsset {
        scale,
        width_px: actual[0],
        height_px: actual[1],
        backend,
        bytes: encode_png(pixmap)?,
    })
}

/// Encode a pixmap as RGBA8 PNG, best compression, adaptive filtering.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RasterError> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Best);
        encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba)?;
        writer.finish()?;
    }
    Ok(out)
}

/// Renderer chosen at startup, with the procedural renderer as safety net.
pub struct Rasterizer {
    primary: Box<dyn Renderer>,
    fallback: ProceduralRenderer,
}

impl Rasterizer {
    /// Probe available renderers once.
    ///
    /// `Auto` prefers the vector renderer and quietly settles for the
    /// procedural one. `Vector` fails when the vector renderer is missing.
    pub fn probe(preference: BackendPreference) -> Result<Self, RasterError> {
        let primary: Box<dyn Renderer> = match preference {
            BackendPreference::Procedural => Box::new(ProceduralRenderer),
            BackendPreference::Vector => {
                probe_vector().ok_or(RasterError::BackendUnavailable(Backend::Vector))?
            }
            BackendPreference::Auto => match probe_vector() {
                Some(renderer) => renderer,
                None => {
                    info!("vector renderer unavailable, using procedural renderer");
                    Box::new(ProceduralRenderer)
                }
            },
        };
        debug!("rasterizer backend: {}", primary.backend());
        Ok(Self::with_renderer(primary))
    }

    pub fn with_renderer(primary: Box<dyn Renderer>) -> Self {
        Self {
            primary,
            fallback: ProceduralRenderer,
        }
    }

    pub fn backend(&self) -> Backend {
        self.primary.backend()
    }

    /// Export one scale. A vector failure falls back to the procedural
    /// renderer for this badge only.
    pub fn export_png(&self, doc: &SvgDocument, scale: Scale) -> Result<RasterAsset, RasterError> {
        match export_png(self.primary.as_ref(), doc, scale) {
            Ok(asset) => Ok(asset),
            Err(err) if self.primary.backend() != Backend::Procedural => {
                warn!(
                    "{} renderer failed for {} @{}: {err}; using procedural renderer",
                    self.primary.backend(),
                    doc.slug(),
                    scale.dir_name(),
                );
                export_png(&self.fallback, doc, scale)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(feature = "vector")]
fn probe_vector() -> Option<Box<dyn Renderer>> {
    VectorRenderer::probe().map(|r| Box::new(r) as Box<dyn Renderer>)
}

#[cfg(not(feature = "vector"))]
fn probe_vector() -> Option<Box<dyn Renderer>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::svg::build_svg;
    use std::io::Cursor;

    struct Broken;

    impl Renderer for Broken {
        fn backend(&self) -> Backend {
            Backend::Vector
        }

        fn render(&self, doc: &SvgDocument, _scale: Scale) -> Result<Pixmap, RasterError> {
            Err(RasterError::Parse {
                slug: doc.slug().to_string(),
                message: "boom".to_string(),
            })
        }
    }

    fn png_size(bytes: &[u8]) -> (u32, u32) {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        (reader.info().width, reader.info().height)
    }

    #[test]
    fn test_scale_serde() {
        assert_eq!(serde_json::to_string(&Scale::X2).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Scale>("1").unwrap(), Scale::X1);
        assert!(serde_json::from_str::<Scale>("3").is_err());
    }

    #[test]
    fn test_backend_preference_parse() {
        assert_eq!("auto".parse::<BackendPreference>().unwrap(), BackendPreference::Auto);
        assert_eq!("procedural".parse::<BackendPreference>().unwrap(), BackendPreference::Procedural);
        assert!("cairo".parse::<BackendPreference>().is_err());
    }

    #[test]
    fn test_procedural_export_sizes() {
        let label = "Human–AI Co-Created";
        let doc = build_svg(label, &compute_layout(label));
        let one = export_png(&ProceduralRenderer, &doc, Scale::X1).unwrap();
        let two = export_png(&ProceduralRenderer, &doc, Scale::X2).unwrap();

        assert_eq!((one.width_px, one.height_px), (197, 20));
        assert_eq!((two.width_px, two.height_px), (394, 40));
        assert_eq!(png_size(&one.bytes), (197, 20));
        assert_eq!(png_size(&two.bytes), (394, 40));
    }

    #[test]
    fn test_falls_back_when_primary_fails() {
        let doc = build_svg("AI Drafted", &compute_layout("AI Drafted"));
        let rasterizer = Rasterizer::with_renderer(Box::new(Broken));

        let asset = rasterizer.export_png(&doc, Scale::X2).unwrap();
        assert_eq!(asset.backend, Backend::Procedural);
        assert_eq!((asset.width_px, asset.height_px), (268, 40));
    }

    #[test]
    fn test_forced_procedural() {
        let rasterizer = Rasterizer::probe(BackendPreference::Procedural).unwrap();
        assert_eq!(rasterizer.backend(), Backend::Procedural);
    }

    #[test]
    fn test_png_signature() {
        let doc = build_svg("AI Generated", &compute_layout("AI Generated"));
        let asset = export_png(&ProceduralRenderer, &doc, Scale::X1).unwrap();
        assert_eq!(&asset.bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[cfg(feature = "vector")]
    #[test]
    fn test_backends_agree_on_size() {
        let vector = VectorRenderer::with_fontdb(fontdb::Database::new());
        let label = "AI Suggested • Human Approved";
        let doc = build_svg(label, &compute_layout(label));
        for scale in Scale::ALL {
            let a = export_png(&vector, &doc, scale).unwrap();
            let b = export_png(&ProceduralRenderer, &doc, scale).unwrap();
            assert_eq!((a.width_px, a.height_px), (b.width_px, b.height_px));
            assert_eq!(png_size(&a.bytes), png_size(&b.bytes));
        }
    }
}
