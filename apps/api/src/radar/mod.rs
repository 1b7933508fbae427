//! Chart rendering: radar and bar charts drawn as SVG, exported as PNG.

pub mod bar;
pub mod chart;
pub mod geometry;
pub mod handlers;
pub mod snapshot;
pub mod svg;

use crate::errors::AppError;
use snapshot::{Rasterizer, Snapshot};

/// Rasterizes `svg` on the blocking pool; resvg is CPU-bound.
pub async fn snapshot_blocking(
    rasterizer: &Rasterizer,
    svg: String,
    width: u32,
    height: u32,
) -> Result<Snapshot, AppError> {
    let rasterizer = rasterizer.clone();
    let snapshot = tokio::task::spawn_blocking(move || rasterizer.rasterize(&svg, width, height))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in chart export: {e}")))??;
    Ok(snapshot)
}
