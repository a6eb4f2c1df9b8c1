use std::collections::BTreeMap;

use crate::models::domain::question::Question;

/// Selected option text per question index. Questions may be left out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerSet {
    selections: BTreeMap<usize, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the option chosen for a question.
    pub fn select(&mut self, index: usize, option: &str) {
        log::debug!("Question {}: selected option {:?}", index, option);
        self.selections.insert(index, option.to_string());
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.selections.get(&index).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn is_complete(&self, question_count: usize) -> bool {
        (0..question_count).all(|i| self.selections.contains_key(&i))
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        AnswerSet {
            selections: iter.into_iter().map(|(i, s)| (i, s.into())).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Score {
    pub earned: u32,
    pub possible: u32,
}

impl Score {
    /// Rounded percentage; `None` for an assessment worth nothing.
    pub fn percentage(&self) -> Option<u32> {
        percentage(self.earned, self.possible)
    }

    pub fn band(&self) -> Option<ScoreBand> {
        self.percentage().map(ScoreBand::from_percentage)
    }

    pub fn passed(&self) -> bool {
        crate::models::domain::result::passes(self.earned, self.possible)
    }
}

pub fn percentage(earned: u32, possible: u32) -> Option<u32> {
    if possible == 0 {
        return None;
    }
    Some((100.0 * f64::from(earned) / f64::from(possible)).round() as u32)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_percentage(percent: u32) -> Self {
        match percent {
            80.. => ScoreBand::Excellent,
            60..=79 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub index: usize,
    pub selected: Option<String>,
    pub correct: bool,
    pub points_awarded: u32,
    pub points_possible: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradedAttempt {
    pub score: Score,
    pub outcomes: Vec<QuestionOutcome>,
}

/// Grades every question against the selected option text.
///
/// Matching is exact and case-sensitive with no partial credit; an
/// unanswered question earns nothing but still counts toward `possible`.
pub fn grade(questions: &[Question], answers: &AnswerSet) -> GradedAttempt {
    let mut earned = 0u32;
    let mut possible = 0u32;
    let mut outcomes = Vec::with_capacity(questions.len());

    for (index, question) in questions.iter().enumerate() {
        let points = question.points();
        let selected = answers.get(index);
        let correct = selected.is_some_and(|s| question.is_correct(s));
        let points_awarded = if correct { points } else { 0 };

        log::debug!(
            "Q{}: selected {:?}, correct {:?}, {} of {} points",
            index + 1,
            selected,
            question.correct_option,
            points_awarded,
            points
        );

        earned = earned.saturating_add(points_awarded);
        possible = possible.saturating_add(points);
        outcomes.push(QuestionOutcome {
            index,
            selected: selected.map(str::to_string),
            correct,
            points_awarded,
            points_possible: points,
        });
    }

    GradedAttempt {
        score: Score { earned, possible },
        outcomes,
    }
}

pub fn score(questions: &[Question], answers: &AnswerSet) -> Score {
    grade(questions, answers).score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_questions() -> Vec<Question> {
        vec![
            Question::new("2+2?", &["3", "4", "5"], "4", 2),
            Question::new("Capital of France?", &["Paris", "Rome", "Berlin"], "Paris", 1),
        ]
    }

    #[test]
    fn test_partial_credit_scenario() {
        let answers: AnswerSet = [(0, "4"), (1, "Rome")].into_iter().collect();

        let result = score(&sample_questions(), &answers);
        assert_eq!(result, Score { earned: 2, possible: 3 });
        assert_eq!(result.percentage(), Some(67));
        assert_eq!(result.band(), Some(ScoreBand::Fair));
        assert!(result.passed());
    }

    #[test]
    fn test_no_answers_scores_zero() {
        let result = score(&sample_questions(), &AnswerSet::new());
        assert_eq!(result, Score { earned: 0, possible: 3 });
        assert_eq!(result.band(), Some(ScoreBand::Poor));
    }

    #[test]
    fn test_all_correct_earns_everything() {
        let questions = sample_questions();
        let answers: AnswerSet = questions
            .iter()
            .enumerate()
            .map(|(i, q)| (i, q.correct_option.clone()))
            .collect();

        let result = score(&questions, &answers);
        assert_eq!(result.earned, result.possible);
        assert_eq!(result.percentage(), Some(100));
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let questions = sample_questions();
        let answers: AnswerSet = [(1, "Paris")].into_iter().collect();

        assert_eq!(score(&questions, &answers), score(&questions, &answers));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let answers: AnswerSet = [(1, "paris")].into_iter().collect();
        assert_eq!(score(&sample_questions(), &answers).earned, 0);
    }

    #[test]
    fn test_missing_points_default_to_one() {
        let mut questions = sample_questions();
        questions[0].points = None;
        questions[1].points = Some(serde_json::json!("n/a"));
        let answers: AnswerSet = [(0, "4"), (1, "Paris")].into_iter().collect();

        assert_eq!(score(&questions, &answers), Score { earned: 2, possible: 2 });
    }

    #[test]
    fn test_answers_beyond_question_count_are_ignored() {
        let answers: AnswerSet = [(0, "4"), (9, "Paris")].into_iter().collect();
        assert_eq!(score(&sample_questions(), &answers).earned, 2);
    }

    #[test]
    fn test_empty_assessment_has_no_percentage() {
        let result = score(&[], &AnswerSet::new());
        assert_eq!(result, Score { earned: 0, possible: 0 });
        assert_eq!(result.percentage(), None);
        assert!(!result.passed());
    }

    #[test]
    fn test_grade_reports_each_question() {
        let answers: AnswerSet = [(0, "4")].into_iter().collect();

        let graded = grade(&sample_questions(), &answers);
        assert_eq!(graded.outcomes.len(), 2);
        assert!(graded.outcomes[0].correct);
        assert_eq!(graded.outcomes[0].points_awarded, 2);
        assert_eq!(graded.outcomes[1].selected, None);
        assert_eq!(graded.outcomes[1].points_possible, 1);
    }

    #[test]
    fn test_answer_set_completeness() {
        let mut answers = AnswerSet::new();
        assert!(answers.is_empty());

        answers.select(0, "4");
        assert!(!answers.is_complete(2));
        answers.select(1, "Rome");
        answers.select(1, "Paris");
        assert!(answers.is_complete(2));
        assert_eq!(answers.answered_count(), 2);
        assert_eq!(answers.get(1), Some("Paris"));
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_percentage(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_percentage(80), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_percentage(79), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_percentage(60), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_percentage(59), ScoreBand::Poor);
    }
}
