use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A candidate record as served by the recruitment backend.
///
/// Score-bearing fields are kept as raw JSON because their shape drifts
/// between backend releases: a field may be a fraction, a percentage, a
/// numeric string, a nested object, or a JSON-encoded string of an object.
/// The scoring module decides what each shape means; this type only carries it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brief_id: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub process_stage: Option<String>,

    #[serde(default)]
    pub skills_score: Option<Value>,
    #[serde(default)]
    pub experience_score: Option<Value>,
    #[serde(default)]
    pub education_score: Option<Value>,
    #[serde(default)]
    pub culture_score: Option<Value>,
    #[serde(default)]
    pub interview_score: Option<Value>,

    #[serde(default)]
    pub score_details: Option<Value>,
    #[serde(default)]
    pub radar_data: Option<Value>,
    #[serde(default)]
    pub cv_analysis: Option<Value>,

    #[serde(default)]
    pub predictive_score: Option<Value>,
    #[serde(default)]
    pub final_predictive_score: Option<Value>,

    #[serde(default)]
    pub appreciations: Option<Value>,
    #[serde(default)]
    pub risks: Option<Value>,
    #[serde(default)]
    pub recommendations: Option<Value>,
}

impl Candidate {
    /// The brief this candidate was evaluated against, accepting numbers and numeric strings.
    pub fn brief_id(&self) -> Option<i64> {
        match self.brief_id.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Display name, falling back to `Candidat #<id>`.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Candidat #{}", self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserializes_minimal_record() {
        let candidate: Candidate = serde_json::from_value(json!({ "id": 12 })).unwrap();
        assert_eq!(candidate.id, 12);
        assert!(candidate.skills_score.is_none());
        assert!(candidate.cv_analysis.is_none());
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let candidate: Candidate = serde_json::from_value(json!({
            "id": 3,
            "email": "someone@example.com",
            "uploaded_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(candidate.id, 3);
    }

    #[test]
    fn test_brief_id_accepts_numeric_string() {
        let candidate: Candidate =
            serde_json::from_value(json!({ "id": 1, "brief_id": " 42 " })).unwrap();
        assert_eq!(candidate.brief_id(), Some(42));
    }

    #[test]
    fn test_brief_id_rejects_garbage() {
        let candidate: Candidate =
            serde_json::from_value(json!({ "id": 1, "brief_id": "unknown" })).unwrap();
        assert_eq!(candidate.brief_id(), None);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let candidate = Candidate {
            id: 9,
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(candidate.display_name(), "Candidat #9");
    }
}
