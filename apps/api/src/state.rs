use std::sync::Arc;

use crate::backend::CandidateSource;
use crate::config::Config;
use crate::radar::snapshot::Rasterizer;
use crate::scoring::reconciler::ScoreReconciler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upstream candidate records. Default: `BackendClient`.
    pub candidates: Arc<dyn CandidateSource>,
    /// Reconciler carrying the configured legacy-estimate weights.
    pub reconciler: ScoreReconciler,
    /// Shares one font database across every chart export.
    pub rasterizer: Rasterizer,
}
