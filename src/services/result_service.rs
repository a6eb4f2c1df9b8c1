use std::{collections::HashMap, sync::Arc};

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    gateway::ApiGateway,
    models::domain::{Assessment, AssessmentResult, Course, InstructorResultRow},
    services::{
        assessment_service::AttemptSheet,
        endpoints,
        scoring::{self, Score, ScoreBand},
    },
};

/// What the student sees right after submitting.
#[derive(Debug, Clone)]
pub struct Submission {
    pub result: AssessmentResult,
    pub score: Score,
}

#[derive(Debug, Clone)]
pub struct ResultEntry {
    pub result: AssessmentResult,
    pub assessment_title: Option<String>,
    pub course_title: Option<String>,
    pub max_score: Option<u32>,
}

impl ResultEntry {
    pub fn percentage(&self) -> Option<u32> {
        self.max_score.and_then(|max| scoring::percentage(self.result.score, max))
    }

    pub fn band(&self) -> Option<ScoreBand> {
        self.percentage().map(ScoreBand::from_percentage)
    }
}

#[derive(Debug, Clone)]
pub struct StudentResultsSummary {
    pub entries: Vec<ResultEntry>,
    pub total_points: u32,
    pub possible_points: u32,
}

impl StudentResultsSummary {
    /// Overall percentage; 0 when nothing with a known maximum was taken.
    pub fn average_percentage(&self) -> u32 {
        scoring::percentage(self.total_points, self.possible_points).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct AssessmentResultGroup {
    pub title: String,
    pub course_title: String,
    pub max_score: u32,
    pub attempts: Vec<InstructorResultRow>,
}

impl AssessmentResultGroup {
    pub fn pass_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.passed()).count()
    }
}

pub struct ResultService {
    gateway: Arc<ApiGateway>,
}

impl ResultService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Scores the sheet locally and records the result. The score is sent
    /// once as computed here and never revised afterwards.
    pub async fn submit_attempt(&self, sheet: &AttemptSheet) -> AppResult<Submission> {
        if !sheet.can_submit() {
            return Err(AppError::ValidationFailure(
                "answer at least one question before submitting".to_string(),
            ));
        }
        let user_id = self.current_user_id()?;

        let score = sheet.score();
        let result = AssessmentResult::new(
            &sheet.assessment.assessment_id,
            &user_id,
            score.earned,
            Utc::now(),
        );

        self.gateway
            .send_json(reqwest::Method::POST, endpoints::RESULTS, &result)
            .await?;
        log::info!(
            "Submitted assessment {}: {}/{} ({} of {} answered)",
            result.assessment_id,
            score.earned,
            score.possible,
            sheet.answered_count(),
            sheet.question_count()
        );

        Ok(Submission { result, score })
    }

    pub async fn my_results(&self) -> AppResult<Vec<AssessmentResult>> {
        let user_id = self.current_user_id()?;
        self.gateway
            .get_json(&endpoints::item(endpoints::RESULTS_BY_STUDENT, &user_id))
            .await
    }

    /// The student's results joined with assessment and course titles.
    /// The three collections are fetched concurrently.
    pub async fn student_summary(&self) -> AppResult<StudentResultsSummary> {
        let (results, assessments, courses) = futures::try_join!(
            self.my_results(),
            self.gateway.get_json::<Vec<Assessment>>(endpoints::ASSESSMENTS),
            self.gateway.get_json::<Vec<Course>>(endpoints::COURSES),
        )?;

        Ok(summarize(results, assessments, courses))
    }

    /// Attempts on the signed-in instructor's assessments, grouped by
    /// assessment title in the order they first appear.
    pub async fn instructor_results(&self) -> AppResult<Vec<AssessmentResultGroup>> {
        let instructor_id = self.current_user_id()?;
        let rows: Vec<InstructorResultRow> = self
            .gateway
            .get_json(&endpoints::item(endpoints::RESULTS_BY_INSTRUCTOR, &instructor_id))
            .await?;
        Ok(group_by_assessment(rows))
    }

    fn current_user_id(&self) -> AppResult<String> {
        self.gateway.session().user_id().ok_or_else(|| {
            AppError::AuthenticationFailure("User ID missing. Please log in.".to_string())
        })
    }
}

fn summarize(
    results: Vec<AssessmentResult>,
    assessments: Vec<Assessment>,
    courses: Vec<Course>,
) -> StudentResultsSummary {
    let assessments: HashMap<String, Assessment> = assessments
        .into_iter()
        .map(|a| (a.assessment_id.clone(), a))
        .collect();
    let courses: HashMap<String, Course> = courses
        .into_iter()
        .map(|c| (c.course_id.clone(), c))
        .collect();

    let entries: Vec<ResultEntry> = results
        .into_iter()
        .map(|result| {
            let assessment = assessments.get(&result.assessment_id);
            let course = assessment
                .and_then(|a| a.course_id.as_ref())
                .and_then(|id| courses.get(id));
            ResultEntry {
                assessment_title: assessment.map(|a| a.title.clone()),
                course_title: course.map(|c| c.title.clone()),
                max_score: assessment.map(Assessment::max_score),
                result,
            }
        })
        .collect();

    let total_points = entries.iter().map(|e| e.result.score).sum();
    let possible_points = entries.iter().filter_map(|e| e.max_score).sum();

    StudentResultsSummary {
        entries,
        total_points,
        possible_points,
    }
}

fn group_by_assessment(rows: Vec<InstructorResultRow>) -> Vec<AssessmentResultGroup> {
    let mut groups: Vec<AssessmentResultGroup> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|g| g.title == row.assessment_title) {
            Some(group) => group.attempts.push(row),
            None => groups.push(AssessmentResultGroup {
                title: row.assessment_title.clone(),
                course_title: row.course_title.clone(),
                max_score: row.max_score,
                attempts: vec![row],
            }),
        }
    }
    groups
}
