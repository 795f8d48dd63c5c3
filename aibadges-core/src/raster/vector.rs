//! Vector renderer - resvg draws the SVG master directly

use resvg::usvg;
use std::sync::Arc;

pub use resvg::usvg::fontdb;
use tiny_skia::{Pixmap, Transform};
use tracing::debug;

use super::{Backend, RasterError, Renderer, Scale};
use crate::svg::SvgDocument;

pub struct VectorRenderer {
    fontdb: Arc<fontdb::Database>,
}

impl VectorRenderer {
    /// Load system fonts. Without a single face the badge text would vanish,
    /// so that counts as unavailable.
    pub fn probe() -> Option<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if db.len() == 0 {
            debug!("no system fonts found");
            return None;
        }
        debug!("loaded {} font faces", db.len());
        Some(Self::with_fontdb(db))
    }

    /// Render with an explicit font set instead of the system fonts.
    pub fn with_fontdb(db: fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(db),
        }
    }
}

impl Renderer for VectorRenderer {
    fn backend(&self) -> Backend {
        Backend::Vector
    }

    fn render(&self, doc: &SvgDocument, scale: Scale) -> Result<Pixmap, RasterError> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);

        let tree = usvg::Tree::from_str(doc.markup(), &options).map_err(|e| RasterError::Parse {
            slug: doc.slug().to_string(),
            message: e.to_string(),
        })?;

        let [width, height] = doc.layout().scaled(scale.factor());
        let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::Canvas(width, height))?;

        let size = tree.size();
        let transform = Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}
