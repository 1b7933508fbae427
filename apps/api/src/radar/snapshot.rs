//! Raster export: SVG surface → RGBA pixmap → PNG bytes.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use png::{BitDepth, ColorType, Encoder};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse failed: {0}")]
    Parse(String),

    #[error("could not allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Rasterizes SVG markup. Cheap to clone; the font database is shared.
#[derive(Clone)]
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
}

impl Rasterizer {
    /// Loads system fonts once so axis labels and legends are drawn as text.
    pub fn with_system_fonts() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::info!(faces = db.len(), "Loaded font database for chart export");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// A rasterizer that skips text. Output only depends on the markup.
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(fontdb::Database::new()),
        }
    }

    pub fn rasterize(&self, svg: &str, width: u32, height: u32) -> Result<Snapshot, RenderError> {
        let options = Options {
            fontdb: self.fontdb.clone(),
            ..Options::default()
        };
        let tree = Tree::from_str(svg, &options).map_err(|e| RenderError::Parse(e.to_string()))?;

        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        let mut png = Vec::new();
        {
            let mut encoder = Encoder::new(&mut png, width, height);
            encoder.set_color(ColorType::Rgba);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(pixmap.data())?;
            writer.finish()?;
        }

        tracing::debug!(width, height, bytes = png.len(), "Rasterized chart");
        Ok(Snapshot { png, width, height })
    }
}

/// Encoded PNG image of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    #[serde(skip)]
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Snapshot {
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    /// `data:image/png;base64,...`, ready to embed in a document.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }
}
