use serde::{Deserialize, Serialize};

use super::survey::{QuestionId, SurveyId};

/// One respondent's answers to a survey.
///
/// Responses are append-only: they are stored in submission order and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub survey_id: SurveyId,
    pub answers: Vec<Answer>,
}

impl Response {
    pub fn answer_for(&self, question_id: QuestionId) -> Option<&AnswerValue> {
        self.answers
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| &a.value)
    }
}

/// An answer to a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: QuestionId,
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(question_id: QuestionId, value: impl Into<AnswerValue>) -> Self {
        Self {
            question_id,
            value: value.into(),
        }
    }
}

/// The value of an answer.
///
/// Both question kinds produce `Single` answers; `Many` exists so stored data with
/// list answers still loads. Serialized untagged: a JSON string or array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Many(Vec<String>),
}

impl AnswerValue {
    /// Try to get this value as a single string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s),
            Self::Many(_) => None,
        }
    }

    /// Flatten the value into one line of text. List values are joined with `"; "`.
    pub fn to_text(&self) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::Many(values) => values.join("; "),
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}
