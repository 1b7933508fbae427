//! Candidate insights: score tier, risks and recommendations shown next to a
//! candidate's profile and copied into exported reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Candidate;
use crate::scoring::normalize::decode_object;
use crate::scoring::reconciler::{global_score, raw_global_score};

/// Global score below which a candidate is flagged for a follow-up interview.
const PREDICTIVE_THRESHOLD: f64 = 70.0;
/// Minimum number of detected competences before the skill set counts as thin.
const MIN_COMPETENCES: usize = 3;

/// Keys tried, in order, when a risk or action item arrives as an object.
const TEXT_KEYS: &[&str] = &["text", "description", "risk", "message", "label", "title"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Excellent,
    Good,
    ToConsider,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => ScoreTier::Excellent,
            s if s >= 60.0 => ScoreTier::Good,
            _ => ScoreTier::ToConsider,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent",
            ScoreTier::Good => "Bon candidat",
            ScoreTier::ToConsider => "À considérer",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub risks: Vec<String>,
    /// Headline recommendation from the backend, when it sends a structured one.
    pub headline: Option<String>,
    pub recommendations: Vec<String>,
}

/// Merges backend-provided risks and recommendations with the rule-based ones.
///
/// Backend items come first, in input order. Duplicates are dropped.
pub fn derive_insights(candidate: &Candidate) -> Insights {
    let mut insights = Insights {
        risks: candidate
            .risks
            .as_ref()
            .map(collect_texts)
            .unwrap_or_default(),
        ..Default::default()
    };

    if let Some(raw) = candidate.recommendations.as_ref() {
        let (headline, actions) = parse_recommendations(raw);
        insights.headline = headline;
        insights.recommendations = actions;
    }

    // an absent score is not a low score
    let below_threshold = raw_global_score(candidate).is_some()
        && global_score(candidate) < PREDICTIVE_THRESHOLD;
    if below_threshold {
        push_unique(
            &mut insights.risks,
            "Score prédictif en dessous du seuil recommandé",
        );
        push_unique(
            &mut insights.recommendations,
            "Organiser un entretien complémentaire technique",
        );
    }

    if competence_count(candidate) < MIN_COMPETENCES {
        push_unique(&mut insights.risks, "Nombre de compétences techniques limité");
        push_unique(
            &mut insights.recommendations,
            "Formation technique complémentaire requise",
        );
    }

    let no_appreciations = candidate
        .appreciations
        .as_ref()
        .and_then(Value::as_array)
        .is_some_and(|a| a.is_empty());
    if no_appreciations {
        push_unique(&mut insights.risks, "Aucune évaluation d'entretien disponible");
        push_unique(
            &mut insights.recommendations,
            "Finaliser l'évaluation d'entretien",
        );
    }

    insights
}

fn competence_count(candidate: &Candidate) -> usize {
    candidate
        .cv_analysis
        .as_ref()
        .and_then(decode_object)
        .and_then(|cv| cv.get("competences").and_then(Value::as_array).map(Vec::len))
        .unwrap_or(0)
}

/// Splits a recommendations payload into `(headline, action items)`.
///
/// Accepts a plain list, a single string, or `{recommendation, actions}`.
fn parse_recommendations(raw: &Value) -> (Option<String>, Vec<String>) {
    match raw {
        Value::Object(map) => {
            let headline = map
                .get("recommendation")
                .or_else(|| map.get("summary"))
                .and_then(text_of);
            let actions = map
                .get("actions")
                .or_else(|| map.get("action_items"))
                .map(collect_texts)
                .unwrap_or_default();
            (headline, actions)
        }
        other => (None, collect_texts(other)),
    }
}

/// Collects free-text entries from a list of strings or string-bearing objects.
fn collect_texts(raw: &Value) -> Vec<String> {
    let mut out = Vec::new();
    match raw {
        Value::Array(items) => {
            for text in items.iter().filter_map(text_of) {
                push_unique(&mut out, &text);
            }
        }
        other => {
            if let Some(text) = text_of(other) {
                out.push(text);
            }
        }
    }
    out
}

fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim(),
        Value::Object(map) => TEXT_KEYS
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))?
            .trim(),
        _ => return None,
    };
    (!text.is_empty()).then(|| text.to_string())
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}
