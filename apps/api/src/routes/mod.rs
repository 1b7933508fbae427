pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::radar::handlers as charts;
use crate::scoring::handlers as scores;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scores API
        .route("/api/v1/scores/reconcile", post(scores::handle_reconcile))
        .route(
            "/api/v1/candidates/:id/scores",
            get(scores::handle_candidate_scores),
        )
        .route(
            "/api/v1/briefs/:brief_id/comparison",
            get(scores::handle_comparison),
        )
        // Chart API
        .route("/api/v1/radar", post(charts::handle_render_radar))
        .route(
            "/api/v1/candidates/:id/radar.png",
            get(charts::handle_candidate_radar),
        )
        .route(
            "/api/v1/candidates/:id/bars.png",
            get(charts::handle_candidate_bars),
        )
        .route(
            "/api/v1/briefs/:brief_id/comparison/radar.png",
            get(charts::handle_comparison_radar),
        )
        .with_state(state)
}
