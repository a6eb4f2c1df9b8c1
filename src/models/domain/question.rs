use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_POINTS: u32 = 1;

/// One multiple-choice question as stored by the backend.
///
/// `points` is kept as raw JSON because authoring screens have historically
/// stored it both as a number and as a numeric string.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Question {
    #[serde(rename = "question", default)]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "answer", default)]
    pub correct_option: String,
    #[serde(rename = "marks", default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl Question {
    pub fn new(prompt: &str, options: &[&str], correct_option: &str, points: u32) -> Self {
        Question {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_option: correct_option.to_string(),
            points: Some(Value::from(points)),
            number: None,
        }
    }

    /// Point value used for scoring. Missing, non-numeric and non-positive
    /// values count as [`DEFAULT_POINTS`].
    pub fn points(&self) -> u32 {
        self.points
            .as_ref()
            .and_then(leading_integer)
            .filter(|p| *p > 0)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .unwrap_or(DEFAULT_POINTS)
    }

    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_option
    }
}

/// Integer prefix of a JSON number or string: `"3 marks"` is 3, `2.9` is 2,
/// `"abc"` has none.
fn leading_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim_start();
            let (negative, digits) = match s.as_bytes().first() {
                Some(b'-') => (true, &s[1..]),
                Some(b'+') => (false, &s[1..]),
                _ => (false, s),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            if end == 0 {
                return None;
            }
            let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
            Some(if negative { -magnitude } else { magnitude })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_points(points: Option<Value>) -> Question {
        Question {
            points,
            ..Question::new("2+2?", &["3", "4", "5"], "4", 1)
        }
    }

    #[test]
    fn test_points_from_number_and_string() {
        assert_eq!(with_points(Some(json!(3))).points(), 3);
        assert_eq!(with_points(Some(json!("4"))).points(), 4);
        assert_eq!(with_points(Some(json!(" 5 marks"))).points(), 5);
        assert_eq!(with_points(Some(json!(2.9))).points(), 2);
    }

    #[test]
    fn test_points_default_to_one() {
        assert_eq!(with_points(None).points(), 1);
        assert_eq!(with_points(Some(json!("abc"))).points(), 1);
        assert_eq!(with_points(Some(json!(null))).points(), 1);
        assert_eq!(with_points(Some(json!(true))).points(), 1);
        assert_eq!(with_points(Some(json!(0))).points(), 1);
        assert_eq!(with_points(Some(json!("-2"))).points(), 1);
    }

    #[test]
    fn test_wire_field_names() {
        let question: Question = serde_json::from_str(
            r#"{"question":"Capital of France?","options":["Paris","Rome","Berlin"],"answer":"Paris","marks":"2","number":"Q2"}"#,
        )
        .unwrap();

        assert_eq!(question.prompt, "Capital of France?");
        assert_eq!(question.correct_option, "Paris");
        assert_eq!(question.points(), 2);
        assert_eq!(question.number.as_deref(), Some("Q2"));

        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["answer"], "Paris");
        assert_eq!(json["marks"], "2");
    }

    #[test]
    fn test_is_correct_is_exact_match() {
        let question = Question::new("Capital of France?", &["Paris", "Rome", "Berlin"], "Paris", 1);

        assert!(question.is_correct("Paris"));
        assert!(!question.is_correct("paris"));
        assert!(!question.is_correct("Paris "));
    }
}
