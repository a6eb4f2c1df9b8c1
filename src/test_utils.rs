#[cfg(test)]
pub mod tokens {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::{DateTime, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{Map, Value};

    use crate::{
        auth::claims::{NAME_IDENTIFIER_CLAIM, ROLE_CLAIM},
        models::domain::user::Role,
    };

    /// A real HS256 token shaped like the backend's, with the role and
    /// user id in their claim-URI keys.
    pub fn signed(role: Role, subject: &str, expires_at: DateTime<Utc>) -> String {
        let mut claims = Map::new();
        claims.insert(ROLE_CLAIM.to_string(), Value::from(role.as_str()));
        claims.insert(NAME_IDENTIFIER_CLAIM.to_string(), Value::from(subject));
        claims.insert("exp".to_string(), Value::from(expires_at.timestamp()));

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("test token encodes")
    }

    pub fn encode_payload(payload: &Value) -> String {
        URL_SAFE_NO_PAD.encode(payload.to_string())
    }

    /// Three segments with an arbitrary payload and a junk signature.
    pub fn unsigned(payload: &Value) -> String {
        format!("eyJhbGciOiJub25lIn0.{}.sig", encode_payload(payload))
    }
}

#[cfg(test)]
pub mod fixtures {
    use crate::models::{
        domain::{Assessment, Question},
        dto::request::{NewAssessment, QuestionDraft},
    };

    /// Two questions worth 2 and 1 points.
    pub fn sample_questions() -> Vec<Question> {
        vec![
            Question::new("2+2?", &["3", "4", "5"], "4", 2),
            Question::new("Capital of France?", &["Paris", "Rome", "Berlin"], "Paris", 1),
        ]
    }

    pub fn sample_assessment(id: &str) -> Assessment {
        Assessment {
            assessment_id: id.to_string(),
            course_id: Some("c-1".to_string()),
            title: "Basics".to_string(),
            questions: sample_questions(),
            max_score: Some(3),
        }
    }

    pub fn sample_draft() -> NewAssessment {
        NewAssessment {
            title: "Basics".to_string(),
            course_id: "c-1".to_string(),
            questions: vec![
                QuestionDraft::new("2+2?", ["3", "4", "5"], "4", 2),
                QuestionDraft::new("Capital of France?", ["Paris", "Rome", "Berlin"], "Paris", 1),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::*, tokens};
    use crate::{auth::token, models::domain::user::Role};
    use chrono::{Duration, Utc};

    #[test]
    fn test_signed_token_decodes() {
        let jwt = tokens::signed(Role::Instructor, "5", Utc::now() + Duration::hours(1));
        let claims = token::decode(&jwt).unwrap();
        assert_eq!(claims.role, Some(Role::Instructor));
        assert_eq!(claims.subject_id.as_deref(), Some("5"));
    }

    #[test]
    fn test_fixtures_are_consistent() {
        let assessment = sample_assessment("a-1");
        assert_eq!(assessment.total_points(), 3);
        assert_eq!(assessment.max_score(), 3);
        assert!(sample_draft().check().is_ok());
        assert_eq!(sample_draft().max_score(), 3);
    }
}
