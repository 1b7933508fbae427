//! Score reconciler: turns a loosely-typed candidate record into the canonical
//! 5-axis score vector used by every card, chart and export.
//!
//! # Resolution order (per axis, no cross-axis blending)
//! 1. direct top-level field (`skills_score`, ...)
//! 2. `score_details.<field>`
//! 3. `radar_data.<display label>`
//! 4. legacy estimate from the CV-analysis block
//! 5. 0
//!
//! Every accepted number goes through `normalize_percentage`. Nothing here
//! fails: bad input resolves to a lower step or to 0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::Candidate;
use crate::scoring::normalize::{
    as_finite_number, decode_object, normalize_percentage, resolve_percentage,
};

// ────────────────────────────────────────────────────────────────────────────
// Axes and score vectors
// ────────────────────────────────────────────────────────────────────────────

/// The five fixed evaluation axes, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Skills,
    Experience,
    Education,
    Culture,
    Interview,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::Skills,
        Axis::Experience,
        Axis::Education,
        Axis::Culture,
        Axis::Interview,
    ];

    /// Backend field name, used at the top level and inside `score_details`.
    pub fn field_name(self) -> &'static str {
        match self {
            Axis::Skills => "skills_score",
            Axis::Experience => "experience_score",
            Axis::Education => "education_score",
            Axis::Culture => "culture_score",
            Axis::Interview => "interview_score",
        }
    }

    /// Short alias some backend releases use inside `score_details`.
    pub fn short_name(self) -> &'static str {
        match self {
            Axis::Skills => "skills",
            Axis::Experience => "experience",
            Axis::Education => "education",
            Axis::Culture => "culture",
            Axis::Interview => "interview",
        }
    }

    /// Display label, also the key used by `radar_data`.
    pub fn label(self) -> &'static str {
        match self {
            Axis::Skills => "Compétences",
            Axis::Experience => "Expérience",
            Axis::Education => "Formation",
            Axis::Culture => "Culture",
            Axis::Interview => "Entretien",
        }
    }
}

/// The display labels of all axes, in rendering order.
pub fn axis_labels() -> Vec<String> {
    Axis::ALL.iter().map(|a| a.label().to_string()).collect()
}

/// Canonical per-candidate profile. Every field is a finite number in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub culture: f64,
    pub interview: f64,
}

impl ScoreVector {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Skills => self.skills,
            Axis::Experience => self.experience,
            Axis::Education => self.education,
            Axis::Culture => self.culture,
            Axis::Interview => self.interview,
        }
    }

    fn set(&mut self, axis: Axis, value: f64) {
        let slot = match axis {
            Axis::Skills => &mut self.skills,
            Axis::Experience => &mut self.experience,
            Axis::Education => &mut self.education,
            Axis::Culture => &mut self.culture,
            Axis::Interview => &mut self.interview,
        };
        *slot = value;
    }

    /// Assembles a vector from per-axis resolutions; unresolved axes stay 0.
    pub fn from_resolutions(resolutions: &[AxisResolution]) -> Self {
        let mut scores = Self::default();
        for resolution in resolutions {
            scores.set(resolution.axis, resolution.value);
        }
        scores
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL.iter().map(move |&axis| (axis, self.get(axis)))
    }

    /// Label-keyed view consumed by the radar renderer.
    pub fn to_labelled(&self) -> HashMap<String, f64> {
        self.iter()
            .map(|(axis, value)| (axis.label().to_string(), value))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Provenance
// ────────────────────────────────────────────────────────────────────────────

/// Which resolution step produced an axis value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Direct,
    ScoreDetails,
    RadarData,
    LegacyEstimate,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisResolution {
    pub axis: Axis,
    pub value: f64,
    pub source: ScoreSource,
}

// ────────────────────────────────────────────────────────────────────────────
// Reconciler
// ────────────────────────────────────────────────────────────────────────────

/// Multipliers of the last-resort estimates. Older dashboards disagreed on
/// them, so they are configuration rather than constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyWeights {
    /// Experience points per CV experience entry (capped at 100).
    pub experience_per_entry: f64,
    /// Education points per CV education entry (capped at 100).
    pub education_per_entry: f64,
    /// Multiplier applied to the average interview appreciation (1–4 scale).
    pub appreciation_scale: f64,
}

impl Default for LegacyWeights {
    fn default() -> Self {
        Self {
            experience_per_entry: 20.0,
            education_per_entry: 25.0,
            appreciation_scale: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreReconciler {
    legacy: LegacyWeights,
}

impl ScoreReconciler {
    pub fn new(legacy: LegacyWeights) -> Self {
        Self { legacy }
    }

    pub fn legacy_weights(&self) -> &LegacyWeights {
        &self.legacy
    }

    /// Resolves the canonical score vector. Same record in, same vector out.
    pub fn reconcile(&self, candidate: &Candidate) -> ScoreVector {
        ScoreVector::from_resolutions(&self.explain(candidate))
    }

    /// Resolves every axis and reports which step produced it.
    pub fn explain(&self, candidate: &Candidate) -> Vec<AxisResolution> {
        let details = candidate.score_details.as_ref().and_then(decode_object);
        let radar = candidate.radar_data.as_ref().and_then(decode_object);
        let cv = candidate.cv_analysis.as_ref().and_then(decode_object);

        let resolutions: Vec<AxisResolution> = Axis::ALL
            .iter()
            .map(|&axis| {
                self.resolve_axis(
                    candidate,
                    axis,
                    details.as_deref(),
                    radar.as_deref(),
                    cv.as_deref(),
                )
            })
            .collect();

        debug!(
            candidate_id = candidate.id,
            sources = ?resolutions.iter().map(|r| r.source).collect::<Vec<_>>(),
            "Reconciled candidate scores"
        );

        resolutions
    }

    fn resolve_axis(
        &self,
        candidate: &Candidate,
        axis: Axis,
        details: Option<&Map<String, Value>>,
        radar: Option<&Map<String, Value>>,
        cv: Option<&Map<String, Value>>,
    ) -> AxisResolution {
        let resolved = |value: f64, source: ScoreSource| AxisResolution {
            axis,
            value,
            source,
        };

        if let Some(value) = direct_field(candidate, axis).and_then(resolve_percentage) {
            return resolved(value, ScoreSource::Direct);
        }

        if let Some(value) = details.and_then(|d| {
            d.get(axis.field_name())
                .and_then(resolve_percentage)
                .or_else(|| d.get(axis.short_name()).and_then(resolve_percentage))
        }) {
            return resolved(value, ScoreSource::ScoreDetails);
        }

        if let Some(value) = radar.and_then(|r| r.get(axis.label()).and_then(resolve_percentage)) {
            return resolved(value, ScoreSource::RadarData);
        }

        if let Some(raw) = cv.and_then(|cv| self.legacy_estimate(candidate, axis, cv)) {
            return resolved(normalize_percentage(raw), ScoreSource::LegacyEstimate);
        }

        resolved(0.0, ScoreSource::Missing)
    }

    /// Raw (un-normalized) estimate from the CV-analysis block.
    fn legacy_estimate(
        &self,
        candidate: &Candidate,
        axis: Axis,
        cv: &Map<String, Value>,
    ) -> Option<f64> {
        match axis {
            Axis::Skills => cv.get("score").and_then(as_finite_number),
            Axis::Experience => list_len(cv.get("experience"))
                .map(|n| (n as f64 * self.legacy.experience_per_entry).min(100.0)),
            Axis::Education => list_len(cv.get("education"))
                .map(|n| (n as f64 * self.legacy.education_per_entry).min(100.0)),
            Axis::Culture => candidate.predictive_score.as_ref().and_then(as_finite_number),
            Axis::Interview => average_appreciation(candidate.appreciations.as_ref())
                .map(|avg| avg * self.legacy.appreciation_scale),
        }
    }
}

/// Reconciles with the default legacy weights.
pub fn reconcile(candidate: &Candidate) -> ScoreVector {
    ScoreReconciler::default().reconcile(candidate)
}

/// The candidate's overall predictive score, normalized to `[0, 100]`; 0 when absent.
///
/// This is an independent upstream value, not derived from the five axes.
pub fn global_score(candidate: &Candidate) -> f64 {
    raw_global_score(candidate)
        .map(normalize_percentage)
        .unwrap_or(0.0)
}

/// Un-normalized global score, `None` when neither field carries a number.
pub fn raw_global_score(candidate: &Candidate) -> Option<f64> {
    candidate
        .predictive_score
        .as_ref()
        .and_then(as_finite_number)
        .or_else(|| {
            candidate
                .final_predictive_score
                .as_ref()
                .and_then(as_finite_number)
        })
}

fn direct_field(candidate: &Candidate, axis: Axis) -> Option<&Value> {
    match axis {
        Axis::Skills => candidate.skills_score.as_ref(),
        Axis::Experience => candidate.experience_score.as_ref(),
        Axis::Education => candidate.education_score.as_ref(),
        Axis::Culture => candidate.culture_score.as_ref(),
        Axis::Interview => candidate.interview_score.as_ref(),
    }
}

fn list_len(value: Option<&Value>) -> Option<usize> {
    value.and_then(Value::as_array).map(Vec::len)
}

/// Mean of the numeric `score` fields of a non-empty appreciation list.
fn average_appreciation(appreciations: Option<&Value>) -> Option<f64> {
    let scores: Vec<f64> = appreciations?
        .as_array()?
        .iter()
        .filter_map(|a| a.get("score").and_then(as_finite_number))
        .collect();
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(value: Value) -> Candidate {
        serde_json::from_value(value).expect("test candidate should deserialize")
    }

    fn assert_in_range(scores: &ScoreVector) {
        for (axis, value) in scores.iter() {
            assert!(
                value.is_finite() && (0.0..=100.0).contains(&value),
                "{axis:?} out of range: {value}"
            );
        }
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let c = candidate(json!({
            "id": 1,
            "skills_score": 0.731,
            "score_details": "{\"experience_score\": 55}",
            "radar_data": { "Formation": 80 },
            "cv_analysis": { "score": 61, "experience": ["a"], "education": [] },
            "predictive_score": 0.66,
            "appreciations": [{ "score": 3 }, { "score": 4 }]
        }));
        let first = reconcile(&c);
        let second = reconcile(&c);
        for ((_, a), (_, b)) in first.iter().zip(second.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_fraction_and_percentage_resolve_identically() {
        let fraction = reconcile(&candidate(json!({ "id": 1, "skills_score": 0.42 })));
        let percent = reconcile(&candidate(json!({ "id": 2, "skills_score": 42 })));
        assert_eq!(fraction.skills, 42.0);
        assert_eq!(percent.skills, 42.0);
    }

    #[test]
    fn test_direct_field_wins_over_score_details() {
        let c = candidate(json!({
            "id": 1,
            "skills_score": 55,
            "score_details": { "skills_score": 10 }
        }));
        let explained = ScoreReconciler::default().explain(&c);
        assert_eq!(explained[0].value, 55.0);
        assert_eq!(explained[0].source, ScoreSource::Direct);
    }

    #[test]
    fn test_score_details_wins_over_radar_data() {
        let c = candidate(json!({
            "id": 1,
            "score_details": { "culture_score": 0.9 },
            "radar_data": { "Culture": 20 }
        }));
        assert_eq!(reconcile(&c).culture, 90.0);
    }

    #[test]
    fn test_score_details_short_key_alias() {
        let c = candidate(json!({ "id": 1, "score_details": { "education": 64 } }));
        assert_eq!(reconcile(&c).education, 64.0);
    }

    #[test]
    fn test_radar_data_uses_display_labels() {
        let c = candidate(json!({
            "id": 1,
            "radar_data": {
                "Compétences": 81,
                "Expérience": 0.6,
                "Formation": "70",
                "Culture": 77.77,
                "Entretien": 50
            }
        }));
        let scores = reconcile(&c);
        assert_eq!(scores.skills, 81.0);
        assert_eq!(scores.experience, 60.0);
        assert_eq!(scores.education, 70.0);
        assert_eq!(scores.culture, 77.8);
        assert_eq!(scores.interview, 50.0);
    }

    #[test]
    fn test_missing_all_sources_is_all_zero() {
        let scores = reconcile(&candidate(json!({ "id": 1 })));
        assert_eq!(scores, ScoreVector::default());
        let explained = ScoreReconciler::default().explain(&candidate(json!({ "id": 1 })));
        assert!(explained.iter().all(|r| r.source == ScoreSource::Missing));
    }

    #[test]
    fn test_legacy_fallback_from_cv_analysis() {
        let c = candidate(json!({
            "id": 1,
            "cv_analysis": { "score": 63, "experience": ["a", "b"], "education": ["x"] }
        }));
        let scores = reconcile(&c);
        assert_eq!(scores.skills, 63.0);
        assert_eq!(scores.experience, 40.0);
        assert_eq!(scores.education, 25.0);
        assert_eq!(scores.culture, 0.0);
        assert_eq!(scores.interview, 0.0);
    }

    #[test]
    fn test_legacy_experience_is_capped() {
        let c = candidate(json!({
            "id": 1,
            "cv_analysis": { "experience": ["a", "b", "c", "d", "e", "f", "g"] }
        }));
        assert_eq!(reconcile(&c).experience, 100.0);
    }

    #[test]
    fn test_legacy_culture_and_interview() {
        let c = candidate(json!({
            "id": 1,
            "cv_analysis": { "score": 50 },
            "predictive_score": 72.5,
            "appreciations": [
                { "question": "q1", "score": 3 },
                { "question": "q2", "score": 4 },
                { "question": "q3", "score": "n/a" }
            ]
        }));
        let scores = reconcile(&c);
        assert_eq!(scores.culture, 72.5);
        assert_eq!(scores.interview, 87.5);
    }

    #[test]
    fn test_legacy_culture_ignores_final_predictive_score() {
        let c = candidate(json!({
            "id": 1,
            "cv_analysis": { "score": 50 },
            "final_predictive_score": 85
        }));
        let scores = reconcile(&c);
        assert_eq!(scores.culture, 0.0);
        assert_eq!(scores.skills, 50.0);
        assert_eq!(global_score(&c), 85.0);

        let sources = ScoreReconciler::default().explain(&c);
        assert_eq!(sources[3].source, ScoreSource::Missing);
    }

    #[test]
    fn test_legacy_weights_are_configurable() {
        let reconciler = ScoreReconciler::new(LegacyWeights {
            experience_per_entry: 15.0,
            education_per_entry: 30.0,
            appreciation_scale: 20.0,
        });
        let c = candidate(json!({
            "id": 1,
            "cv_analysis": { "experience": ["a", "b"], "education": ["x", "y"] },
            "appreciations": [{ "score": 4 }]
        }));
        let scores = reconciler.reconcile(&c);
        assert_eq!(scores.experience, 30.0);
        assert_eq!(scores.education, 60.0);
        assert_eq!(scores.interview, 80.0);
    }

    #[test]
    fn test_no_legacy_estimate_without_cv_analysis() {
        let c = candidate(json!({
            "id": 1,
            "predictive_score": 80,
            "appreciations": [{ "score": 4 }]
        }));
        let scores = reconcile(&c);
        assert_eq!(scores.culture, 0.0);
        assert_eq!(scores.interview, 0.0);
    }

    #[test]
    fn test_malformed_nested_json_falls_through() {
        let c = candidate(json!({
            "id": 1,
            "score_details": "{not json",
            "radar_data": "{\"Compétences\": 48}"
        }));
        let explained = ScoreReconciler::default().explain(&c);
        assert_eq!(explained[0].value, 48.0);
        assert_eq!(explained[0].source, ScoreSource::RadarData);
    }

    #[test]
    fn test_non_numeric_direct_field_falls_through() {
        let c = candidate(json!({
            "id": 1,
            "interview_score": "excellent",
            "score_details": { "interview_score": 0.5 }
        }));
        assert_eq!(reconcile(&c).interview, 50.0);
    }

    #[test]
    fn test_adversarial_records_stay_in_range() {
        let records = vec![
            json!({ "id": 1, "skills_score": -12, "experience_score": 1e9 }),
            json!({ "id": 2, "skills_score": null, "score_details": [1, 2, 3] }),
            json!({ "id": 3, "radar_data": { "Culture": "-inf" }, "culture_score": "inf" }),
            json!({ "id": 4, "cv_analysis": { "score": -0.5, "experience": "lots" } }),
            json!({ "id": 5, "cv_analysis": "[]", "predictive_score": { "value": 3 } }),
            json!({ "id": 6, "appreciations": "none", "cv_analysis": {} }),
        ];
        for record in records {
            let scores = reconcile(&candidate(record));
            assert_in_range(&scores);
        }
    }

    #[test]
    fn test_global_score_prefers_predictive_score() {
        let c = candidate(json!({
            "id": 1,
            "predictive_score": 0.81,
            "final_predictive_score": 40
        }));
        assert_eq!(global_score(&c), 81.0);

        let c = candidate(json!({ "id": 1, "final_predictive_score": 64.25 }));
        assert_eq!(global_score(&c), 64.3);

        assert_eq!(global_score(&candidate(json!({ "id": 1 }))), 0.0);
    }

    #[test]
    fn test_labelled_view_uses_display_labels() {
        let scores = ScoreVector {
            skills: 10.0,
            experience: 20.0,
            education: 30.0,
            culture: 40.0,
            interview: 50.0,
        };
        let labelled = scores.to_labelled();
        assert_eq!(labelled.len(), 5);
        assert_eq!(labelled["Formation"], 30.0);
        assert_eq!(axis_labels()[4], "Entretien");
    }
}
