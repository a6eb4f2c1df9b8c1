use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fraction of the maximum score needed for a "Pass" badge.
pub const PASS_RATIO: f64 = 0.6;

/// One recorded attempt. Also the submission payload; `result_id` is
/// assigned by the backend and omitted when sending.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::models::string_or_number"
    )]
    pub result_id: Option<String>,
    #[serde(deserialize_with = "crate::models::id_string")]
    pub assessment_id: String,
    #[serde(deserialize_with = "crate::models::id_string")]
    pub user_id: String,
    pub score: u32,
    #[serde(deserialize_with = "crate::models::utc_timestamp")]
    pub attempt_date: DateTime<Utc>,
}

impl AssessmentResult {
    pub fn new(assessment_id: &str, user_id: &str, score: u32, attempt_date: DateTime<Utc>) -> Self {
        AssessmentResult {
            result_id: None,
            assessment_id: assessment_id.to_string(),
            user_id: user_id.to_string(),
            score,
            attempt_date,
        }
    }
}

/// Row of the instructor-scoped results query.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorResultRow {
    #[serde(default)]
    pub assessment_title: String,
    #[serde(default)]
    pub course_title: String,
    #[serde(default)]
    pub max_score: u32,
    pub score: u32,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_email: Option<String>,
    #[serde(deserialize_with = "crate::models::utc_timestamp")]
    pub attempt_date: DateTime<Utc>,
}

impl InstructorResultRow {
    pub fn passed(&self) -> bool {
        passes(self.score, self.max_score)
    }
}

pub fn passes(score: u32, max_score: u32) -> bool {
    max_score > 0 && f64::from(score) / f64::from(max_score) >= PASS_RATIO
}
