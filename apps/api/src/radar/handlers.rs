//! Axum route handlers for the Chart API.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::radar::bar::render_score_bars;
use crate::radar::chart::{self, RadarDataset, RadarOptions, RadarRenderer};
use crate::radar::snapshot::Snapshot;
use crate::radar::snapshot_blocking;
use crate::scoring::comparison::PALETTE;
use crate::scoring::handlers::{fetch_candidate, load_comparison};
use crate::scoring::reconciler::axis_labels;
use crate::state::AppState;

pub const MIN_SIZE: u32 = 120;
pub const MAX_SIZE: u32 = 2000;
/// Each dataset adds a legend row, so this also bounds the surface height.
pub const MAX_DATASETS: usize = 12;
pub const MAX_AXES: usize = 24;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RadarRequest {
    #[serde(default)]
    pub datasets: Vec<RadarDataset>,
    /// Axis labels in spoke order. Defaults to the five score axes.
    pub axes: Option<Vec<String>>,
    pub size: Option<u32>,
    #[serde(default)]
    pub show_values: bool,
}

#[derive(Debug, Serialize)]
pub struct RadarResponse {
    pub svg: String,
    pub png_base64: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
pub struct RadarQuery {
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct BarsQuery {
    /// Include culture and interview bars.
    #[serde(default)]
    pub all: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/radar
///
/// Renders arbitrary datasets and returns both the SVG markup and its PNG
/// snapshot.
pub async fn handle_render_radar(
    State(state): State<AppState>,
    Json(request): Json<RadarRequest>,
) -> Result<Json<RadarResponse>, AppError> {
    let size = validate_size(request.size, state.config.radar_size)?;
    let axes = request.axes.unwrap_or_else(axis_labels);
    validate_counts(request.datasets.len(), axes.len())?;

    let surface = RadarRenderer::with_datasets(
        RadarOptions {
            size,
            show_values: request.show_values,
        },
        &request.datasets,
        &axes,
    )
    .into_surface();
    let snapshot =
        snapshot_blocking(&state.rasterizer, surface.svg.clone(), surface.width, surface.height)
            .await?;

    Ok(Json(RadarResponse {
        svg: surface.svg,
        png_base64: snapshot.to_base64(),
        width: surface.width,
        height: surface.height,
    }))
}

/// GET /api/v1/candidates/:id/radar.png
///
/// Single-candidate radar with the value printed under each axis label.
pub async fn handle_candidate_radar(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
    Query(query): Query<RadarQuery>,
) -> Result<Response, AppError> {
    let size = validate_size(query.size, state.config.radar_size)?;
    let candidate = fetch_candidate(&state, candidate_id).await?;
    let scores = state.reconciler.reconcile(&candidate);

    let dataset = RadarDataset {
        name: candidate.display_name(),
        color: PALETTE[0].to_string(),
        values: scores.to_labelled(),
    };
    let surface = chart::draw(
        &[dataset],
        &axis_labels(),
        &RadarOptions {
            size,
            show_values: true,
        },
    );
    let snapshot =
        snapshot_blocking(&state.rasterizer, surface.svg, surface.width, surface.height).await?;
    Ok(png_response(snapshot))
}

/// GET /api/v1/candidates/:id/bars.png
pub async fn handle_candidate_bars(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
    Query(query): Query<BarsQuery>,
) -> Result<Response, AppError> {
    let candidate = fetch_candidate(&state, candidate_id).await?;
    let scores = state.reconciler.reconcile(&candidate);

    let surface = render_score_bars(&scores, query.all);
    let snapshot =
        snapshot_blocking(&state.rasterizer, surface.svg, surface.width, surface.height).await?;
    Ok(png_response(snapshot))
}

/// GET /api/v1/briefs/:brief_id/comparison/radar.png
pub async fn handle_comparison_radar(
    State(state): State<AppState>,
    Path(brief_id): Path<i64>,
    Query(query): Query<RadarQuery>,
) -> Result<Response, AppError> {
    let size = validate_size(query.size, state.config.radar_size)?;
    let comparison = load_comparison(&state, brief_id).await?;

    let surface = chart::render(&comparison.datasets(), &axis_labels(), size);
    let snapshot =
        snapshot_blocking(&state.rasterizer, surface.svg, surface.width, surface.height).await?;
    Ok(png_response(snapshot))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate_size(requested: Option<u32>, default: u32) -> Result<u32, AppError> {
    let size = requested.unwrap_or(default);
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        return Err(AppError::Validation(format!(
            "size must be between {MIN_SIZE} and {MAX_SIZE} pixels (got {size})"
        )));
    }
    Ok(size)
}

fn validate_counts(datasets: usize, axes: usize) -> Result<(), AppError> {
    if datasets > MAX_DATASETS {
        return Err(AppError::Validation(format!(
            "at most {MAX_DATASETS} datasets per chart (got {datasets})"
        )));
    }
    if axes > MAX_AXES {
        return Err(AppError::Validation(format!(
            "at most {MAX_AXES} axes per chart (got {axes})"
        )));
    }
    Ok(())
}

fn png_response(snapshot: Snapshot) -> Response {
    (
        [(header::CONTENT_TYPE, "image/png")],
        Bytes::from(snapshot.png),
    )
        .into_response()
}
