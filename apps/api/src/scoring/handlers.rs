//! Axum route handlers for the Scores API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::Candidate;
use crate::radar::{chart, snapshot_blocking};
use crate::scoring::comparison::{build_comparison, Comparison};
use crate::scoring::insights::{derive_insights, Insights, ScoreTier};
use crate::scoring::reconciler::{
    axis_labels, global_score, AxisResolution, ScoreReconciler, ScoreVector,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// Everything a candidate card or report needs about one candidate's scores.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub candidate_id: i64,
    pub name: String,
    pub scores: ScoreVector,
    /// Per-axis provenance, in axis order.
    pub sources: Vec<AxisResolution>,
    pub global_score: f64,
    pub tier: ScoreTier,
    pub tier_label: String,
    pub insights: Insights,
}

impl ScoreReport {
    pub fn build(candidate: &Candidate, reconciler: &ScoreReconciler) -> Self {
        let sources = reconciler.explain(candidate);
        let scores = ScoreVector::from_resolutions(&sources);
        let global = global_score(candidate);
        let tier = ScoreTier::from_score(global);

        Self {
            candidate_id: candidate.id,
            name: candidate.display_name(),
            scores,
            sources,
            global_score: global,
            tier,
            tier_label: tier.label().to_string(),
            insights: derive_insights(candidate),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    #[serde(flatten)]
    pub comparison: Comparison,
    /// Comparison radar as a `data:image/png;base64,` URL, for document exporters.
    pub radar: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/scores/reconcile
///
/// Reconciles a candidate record supplied by the caller. Nothing is fetched
/// upstream, so front-ends can score records they already hold.
pub async fn handle_reconcile(
    State(state): State<AppState>,
    Json(candidate): Json<Candidate>,
) -> Json<ScoreReport> {
    Json(ScoreReport::build(&candidate, &state.reconciler))
}

/// GET /api/v1/candidates/:id/scores
pub async fn handle_candidate_scores(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
) -> Result<Json<ScoreReport>, AppError> {
    let candidate = fetch_candidate(&state, candidate_id).await?;
    Ok(Json(ScoreReport::build(&candidate, &state.reconciler)))
}

/// GET /api/v1/briefs/:brief_id/comparison
///
/// Top candidates of a brief with their score vectors, pipeline stats, and
/// the rendered comparison radar.
pub async fn handle_comparison(
    State(state): State<AppState>,
    Path(brief_id): Path<i64>,
) -> Result<Json<ComparisonResponse>, AppError> {
    let comparison = load_comparison(&state, brief_id).await?;

    let surface = chart::render(
        &comparison.datasets(),
        &axis_labels(),
        state.config.radar_size,
    );
    let snapshot = snapshot_blocking(&state.rasterizer, surface.svg, surface.width, surface.height)
        .await?;

    Ok(Json(ComparisonResponse {
        comparison,
        radar: snapshot.data_url(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Shared lookups
// ────────────────────────────────────────────────────────────────────────────

pub async fn fetch_candidate(state: &AppState, candidate_id: i64) -> Result<Candidate, AppError> {
    state
        .candidates
        .candidate(candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))
}

pub async fn load_comparison(state: &AppState, brief_id: i64) -> Result<Comparison, AppError> {
    let candidates = state.candidates.candidates().await?;
    let comparison = build_comparison(
        &candidates,
        Some(brief_id),
        state.config.comparison_max_candidates,
        &state.reconciler,
    );
    tracing::info!(
        brief_id,
        total = comparison.stats.total,
        compared = comparison.entries.len(),
        "Built candidate comparison"
    );
    Ok(comparison)
}
