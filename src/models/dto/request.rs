use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use validator::{Validate, ValidationError};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{question::Question, user::Role},
};

/// Options every authored question carries.
pub const OPTIONS_PER_QUESTION: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

// Secrets are checked at the struct level: field-level validators would
// need the value to be `Serialize` to attach it to the error.
fn secret_not_blank(value: &SecretString, field: &'static str) -> Result<(), ValidationError> {
    if value.expose_secret().trim().is_empty() {
        return Err(ValidationError::new(field).with_message(format!("{} must not be blank", field).into()));
    }
    Ok(())
}

fn password_strength(value: &SecretString) -> Result<(), ValidationError> {
    if value.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new("password_length").with_message(
            format!("password must be at least {} characters", MIN_PASSWORD_LEN).into(),
        ));
    }
    Ok(())
}

fn login_secrets(request: &LoginRequest) -> Result<(), ValidationError> {
    secret_not_blank(&request.password, "password")
}

fn register_secrets(request: &RegisterRequest) -> Result<(), ValidationError> {
    password_strength(&request.password)
}

fn reset_secrets(request: &ResetPasswordRequest) -> Result<(), ValidationError> {
    secret_not_blank(&request.token, "token")?;
    secret_not_blank(&request.new_password, "newPassword")
}

fn all_options_filled(options: &[String]) -> Result<(), ValidationError> {
    if options.iter().any(|o| o.trim().is_empty()) {
        return Err(ValidationError::new("options").with_message("every option must be filled".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "login_secrets"))]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        LoginRequest {
            email: email.trim().to_string(),
            password: SecretString::from(password.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "register_secrets"))]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(serialize_with = "expose")]
    pub password: SecretString,

    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "reset_secrets"))]
pub struct ResetPasswordRequest {
    #[serde(serialize_with = "expose")]
    pub token: SecretString,

    #[serde(serialize_with = "expose")]
    pub new_password: SecretString,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<String>,

    #[validate(url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl NewCourse {
    pub fn new(title: &str, description: &str) -> Self {
        NewCourse {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            instructor_id: None,
            media_url: None,
            media_type: None,
        }
    }

    pub fn with_media(mut self, url: &str, media_type: &str) -> Self {
        self.media_url = Some(url.trim().to_string());
        self.media_type = Some(media_type.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    #[validate(url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct UploadUrlRequest {
    #[validate(url)]
    pub url: String,

    #[validate(custom(function = "not_blank"))]
    pub title: String,
}

/// A question as typed into the authoring form.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct QuestionDraft {
    #[validate(custom(function = "not_blank"))]
    pub prompt: String,

    #[validate(
        length(equal = 3, message = "a question needs exactly three options"),
        custom(function = "all_options_filled")
    )]
    pub options: Vec<String>,

    #[validate(custom(function = "not_blank"))]
    pub answer: String,

    #[validate(range(min = 1, message = "marks must be at least 1"))]
    pub marks: u32,
}

impl QuestionDraft {
    pub fn new(prompt: &str, options: [&str; OPTIONS_PER_QUESTION], answer: &str, marks: u32) -> Self {
        QuestionDraft {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: answer.to_string(),
            marks,
        }
    }

    /// The answer must be one option verbatim, otherwise the question can
    /// never be scored as correct.
    fn check_answer(&self) -> Result<(), String> {
        if self.options.iter().any(|o| *o == self.answer) {
            Ok(())
        } else {
            Err(format!("answer '{}' is not one of the options", self.answer))
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewAssessment {
    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub course_id: String,

    #[validate(length(min = 1, message = "an assessment needs at least one question"))]
    pub questions: Vec<QuestionDraft>,
}

/// Wire shape of `POST /api/Assessment`: questions travel JSON-encoded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPayload {
    pub title: String,
    pub course_id: String,
    pub questions: String,
    pub max_score: u32,
}

impl NewAssessment {
    /// Field checks plus the per-question rules, reported with 1-based
    /// question numbers.
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        for (index, question) in self.questions.iter().enumerate() {
            question
                .validate()
                .map_err(|e| AppError::ValidationFailure(format!("Q{}: {}", index + 1, e)))?;
            question
                .check_answer()
                .map_err(|e| AppError::ValidationFailure(format!("Q{}: {}", index + 1, e)))?;
        }
        Ok(())
    }

    pub fn max_score(&self) -> u32 {
        self.questions.iter().map(|q| q.marks).sum()
    }

    pub fn to_payload(&self) -> AppResult<AssessmentPayload> {
        let numbered: Vec<Question> = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, draft)| Question {
                prompt: draft.prompt.clone(),
                options: draft.options.clone(),
                correct_option: draft.answer.clone(),
                points: Some(draft.marks.into()),
                number: Some(format!("Q{}", index + 1)),
            })
            .collect();

        Ok(AssessmentPayload {
            title: self.title.trim().to_string(),
            course_id: self.course_id.clone(),
            questions: serde_json::to_string(&numbered)?,
            max_score: self.max_score(),
        })
    }
}
