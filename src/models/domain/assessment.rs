use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::domain::question::Question;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(deserialize_with = "crate::models::id_string")]
    pub assessment_id: String,
    #[serde(default, deserialize_with = "crate::models::string_or_number")]
    pub course_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "questions_field")]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<i64>,
}

impl Assessment {
    /// Stored `maxScore` when the backend has one, otherwise the sum of
    /// question points.
    pub fn max_score(&self) -> u32 {
        self.max_score
            .and_then(|m| u32::try_from(m).ok())
            .unwrap_or_else(|| self.total_points())
    }

    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(Question::points).sum()
    }

    pub fn belongs_to_course(&self, course_id: &str) -> bool {
        self.course_id.as_deref() == Some(course_id)
    }
}

/// The backend persists questions as a JSON-encoded string; some
/// endpoints inline the array instead. A string that does not parse yields
/// no questions.
fn questions_field<'de, D>(deserializer: D) -> Result<Vec<Question>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(Value::String(raw)) => match serde_json::from_str(&raw) {
            Ok(questions) => Ok(questions),
            Err(e) => {
                log::warn!("Ignoring unreadable question list: {}", e);
                Ok(Vec::new())
            }
        },
        Some(other) => serde_json::from_value(other).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_parsed_from_encoded_string() {
        let json = r#"{
            "assessmentId": "a-1",
            "courseId": "c-1",
            "title": "Basics",
            "questions": "[{\"question\":\"2+2?\",\"options\":[\"3\",\"4\",\"5\"],\"answer\":\"4\",\"marks\":2}]",
            "maxScore": 2
        }"#;

        let assessment: Assessment = serde_json::from_str(json).unwrap();
        assert_eq!(assessment.questions.len(), 1);
        assert_eq!(assessment.questions[0].correct_option, "4");
        assert_eq!(assessment.max_score(), 2);
    }

    #[test]
    fn test_questions_parsed_from_inline_array() {
        let json = r#"{
            "assessmentId": 9,
            "title": "Geography",
            "questions": [{"question":"Capital of France?","options":["Paris","Rome","Berlin"],"answer":"Paris"}]
        }"#;

        let assessment: Assessment = serde_json::from_str(json).unwrap();
        assert_eq!(assessment.assessment_id, "9");
        assert_eq!(assessment.questions[0].points(), 1);
        assert_eq!(assessment.max_score(), 1);
        assert!(assessment.course_id.is_none());
    }

    #[test]
    fn test_missing_questions_is_empty() {
        let assessment: Assessment =
            serde_json::from_str(r#"{"assessmentId":"a","title":"t","questions":null}"#).unwrap();
        assert!(assessment.questions.is_empty());
        assert_eq!(assessment.max_score(), 0);
    }

    #[test]
    fn test_garbage_questions_string_yields_no_questions() {
        let json = r#"[
            {"assessmentId": "a1", "title": "Broken", "questions": "not json", "maxScore": 4},
            {"assessmentId": "a2", "title": "Fine", "questions": "[]"}
        ]"#;

        let assessments: Vec<Assessment> = serde_json::from_str(json).unwrap();
        assert_eq!(assessments.len(), 2);
        assert!(assessments[0].questions.is_empty());
        assert_eq!(assessments[0].max_score(), 4);
    }

    #[test]
    fn test_belongs_to_course() {
        let assessment: Assessment =
            serde_json::from_str(r#"{"assessmentId":"a","courseId":5}"#).unwrap();
        assert!(assessment.belongs_to_course("5"));
        assert!(!assessment.belongs_to_course("6"));
    }
}
