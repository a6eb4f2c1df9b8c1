use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    gateway::ApiGateway,
    models::{domain::Assessment, dto::request::NewAssessment},
    services::{
        endpoints,
        scoring::{self, AnswerSet, GradedAttempt, Score},
    },
};

/// An assessment being taken: the question bank plus the answers so far.
#[derive(Debug, Clone)]
pub struct AttemptSheet {
    pub assessment: Assessment,
    pub answers: AnswerSet,
}

impl AttemptSheet {
    pub fn new(assessment: Assessment) -> Self {
        AttemptSheet {
            assessment,
            answers: AnswerSet::new(),
        }
    }

    /// Records a choice. The option must be one the question offers.
    pub fn select(&mut self, index: usize, option: &str) -> AppResult<()> {
        let question = self.assessment.questions.get(index).ok_or_else(|| {
            AppError::ValidationFailure(format!("there is no question {}", index + 1))
        })?;
        if !question.options.iter().any(|o| o == option) {
            return Err(AppError::ValidationFailure(format!(
                "'{}' is not an option of question {}",
                option,
                index + 1
            )));
        }
        self.answers.select(index, option);
        Ok(())
    }

    pub fn question_count(&self) -> usize {
        self.assessment.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.answered_count()
    }

    /// Unanswered questions are scored as wrong, so a sheet with at least
    /// one answer may be submitted.
    pub fn can_submit(&self) -> bool {
        !self.answers.is_empty()
    }

    pub fn score(&self) -> Score {
        scoring::score(&self.assessment.questions, &self.answers)
    }

    pub fn grade(&self) -> GradedAttempt {
        scoring::grade(&self.assessment.questions, &self.answers)
    }
}

pub struct AssessmentService {
    gateway: Arc<ApiGateway>,
}

impl AssessmentService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list_assessments(&self) -> AppResult<Vec<Assessment>> {
        self.gateway.get_json(endpoints::ASSESSMENTS).await
    }

    pub async fn assessments_for_course(&self, course_id: &str) -> AppResult<Vec<Assessment>> {
        let assessments = self.list_assessments().await?;
        Ok(assessments
            .into_iter()
            .filter(|a| a.belongs_to_course(course_id))
            .collect())
    }

    pub async fn get_assessment(&self, assessment_id: &str) -> AppResult<Assessment> {
        self.gateway
            .get_json(&endpoints::item(endpoints::ASSESSMENTS, assessment_id))
            .await
    }

    /// Assessments authored by the signed-in instructor.
    pub async fn my_assessments(&self) -> AppResult<Vec<Assessment>> {
        let instructor_id = self.gateway.session().user_id().ok_or_else(|| {
            AppError::AuthenticationFailure("no signed-in user".to_string())
        })?;
        self.gateway
            .get_json(&endpoints::item(endpoints::ASSESSMENTS_BY_INSTRUCTOR, &instructor_id))
            .await
    }

    pub async fn create_assessment(&self, assessment: &NewAssessment) -> AppResult<()> {
        assessment.check()?;
        let payload = assessment.to_payload()?;

        self.gateway
            .send_json(reqwest::Method::POST, endpoints::ASSESSMENTS, &payload)
            .await?;
        log::info!(
            "Created assessment '{}' with {} questions worth {} points",
            payload.title,
            assessment.questions.len(),
            payload.max_score
        );
        Ok(())
    }

    pub async fn update_assessment(&self, assessment_id: &str, assessment: &NewAssessment) -> AppResult<()> {
        assessment.check()?;
        let payload = assessment.to_payload()?;

        self.gateway
            .put_json(&endpoints::item(endpoints::ASSESSMENTS, assessment_id), &payload)
            .await?;
        log::info!("Updated assessment {}", assessment_id);
        Ok(())
    }

    pub async fn delete_assessment(&self, assessment_id: &str) -> AppResult<()> {
        self.gateway
            .delete(&endpoints::item(endpoints::ASSESSMENTS, assessment_id))
            .await?;
        log::info!("Deleted assessment {}", assessment_id);
        Ok(())
    }

    /// Loads an assessment and opens a blank answer sheet for it.
    pub async fn start_attempt(&self, assessment_id: &str) -> AppResult<AttemptSheet> {
        let assessment = self.get_assessment(assessment_id).await?;
        if assessment.questions.is_empty() {
            return Err(AppError::NotFound(format!(
                "assessment {} has no questions",
                assessment_id
            )));
        }
        Ok(AttemptSheet::new(assessment))
    }
}
