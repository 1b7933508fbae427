//! Multi-candidate comparison: picks the top candidates of a brief and turns
//! them into radar datasets that share the same axis layout.

use serde::{Deserialize, Serialize};

use crate::models::Candidate;
use crate::radar::chart::RadarDataset;
use crate::scoring::insights::ScoreTier;
use crate::scoring::reconciler::{global_score, ScoreReconciler, ScoreVector};

/// Dataset colors, assigned by rank and reused cyclically.
pub const PALETTE: [&str; 5] = ["#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6"];

/// Process stages tracked in pipeline statistics, in workflow order.
const STAGES: [&str; 4] = [
    "cv_analysis",
    "interview_questions",
    "interview_evaluation",
    "final_evaluation",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub rank: usize,
    pub candidate_id: i64,
    pub name: String,
    pub color: String,
    pub scores: ScoreVector,
    pub global_score: f64,
    pub tier: ScoreTier,
    pub tier_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStats {
    pub total: usize,
    pub stages: Vec<StageCount>,
    /// Mean global score of the candidates that have one (before the top-N cut).
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub brief_id: Option<i64>,
    pub entries: Vec<ComparisonEntry>,
    pub stats: PipelineStats,
}

impl Comparison {
    /// One radar dataset per entry, in rank order.
    pub fn datasets(&self) -> Vec<RadarDataset> {
        self.entries
            .iter()
            .map(|e| RadarDataset {
                name: format!("{} ({:.1}%)", e.name, e.global_score),
                color: e.color.clone(),
                values: e.scores.to_labelled(),
            })
            .collect()
    }
}

/// Builds the comparison for `brief_id` (every candidate when `None`).
///
/// Candidates without a global score are left out, the rest are ranked by
/// global score (ties keep input order) and cut to `max_candidates`.
pub fn build_comparison(
    candidates: &[Candidate],
    brief_id: Option<i64>,
    max_candidates: usize,
    reconciler: &ScoreReconciler,
) -> Comparison {
    let in_brief: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| brief_id.is_none() || c.brief_id() == brief_id)
        .collect();

    let mut scored: Vec<(&Candidate, f64)> = in_brief
        .iter()
        .map(|c| (*c, global_score(c)))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    let average_score = if scored.is_empty() {
        0.0
    } else {
        scored.iter().map(|(_, s)| s).sum::<f64>() / scored.len() as f64
    };

    // sort_by is stable: equal scores keep backend order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let entries = scored
        .into_iter()
        .take(max_candidates)
        .enumerate()
        .map(|(index, (candidate, score))| {
            let tier = ScoreTier::from_score(score);
            ComparisonEntry {
                rank: index + 1,
                candidate_id: candidate.id,
                name: candidate.display_name(),
                color: PALETTE[index % PALETTE.len()].to_string(),
                scores: reconciler.reconcile(candidate),
                global_score: score,
                tier,
                tier_label: tier.label().to_string(),
            }
        })
        .collect();

    let stages = STAGES
        .iter()
        .map(|stage| StageCount {
            stage: stage.to_string(),
            count: in_brief
                .iter()
                .filter(|c| c.process_stage.as_deref() == Some(*stage))
                .count(),
        })
        .collect();

    Comparison {
        brief_id,
        entries,
        stats: PipelineStats {
            total: in_brief.len(),
            stages,
            average_score: (average_score * 10.0).round() / 10.0,
        },
    }
}
