//! Results aggregation and export.
//!
//! [`SurveyResults::compute`] turns a survey and its responses into one summary per
//! question: a tally of chosen options for choice questions, or the collected answers
//! for free-text questions. The summaries feed the CSV export ([`csv`]) and the paginated
//! report ([`report`], rendered to PDF by [`pdf`]).

pub mod csv;
pub mod pdf;
pub mod report;

use serde::Serialize;

use crate::models::{Question, QuestionKind, Response, Survey, SurveyId};

/// Aggregated results of a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyResults {
    pub survey_id: SurveyId,
    pub title: String,
    pub response_count: usize,
    pub questions: Vec<QuestionResult>,
}

/// Aggregated answers to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    pub question: Question,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Summary {
    /// Options chosen at least once, with their counts, in first-seen order.
    Tally { counts: Vec<OptionCount> },
    /// Non-empty free-text answers in response order.
    Answers { answers: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionCount {
    pub label: String,
    pub count: u64,
}

impl SurveyResults {
    pub fn compute<'a, I>(survey: &Survey, responses: I) -> Self
    where
        I: IntoIterator<Item = &'a Response>,
    {
        let responses: Vec<&Response> = responses
            .into_iter()
            .filter(|r| r.survey_id == survey.id)
            .collect();

        let questions = survey
            .questions
            .iter()
            .map(|q| QuestionResult {
                question: q.clone(),
                summary: summarize(q, &responses),
            })
            .collect();

        Self {
            survey_id: survey.id,
            title: survey.title.clone(),
            response_count: responses.len(),
            questions,
        }
    }

    pub fn question(&self, text: &str) -> Option<&QuestionResult> {
        self.questions.iter().find(|r| r.question.text == text)
    }
}

impl Summary {
    /// Count for `label`, or `None` if it was never chosen (or this is not a tally).
    pub fn count_of(&self, label: &str) -> Option<u64> {
        match self {
            Self::Tally { counts } => counts.iter().find(|c| c.label == label).map(|c| c.count),
            Self::Answers { .. } => None,
        }
    }
}

fn summarize(question: &Question, responses: &[&Response]) -> Summary {
    let values = responses
        .iter()
        .filter_map(|r| r.answer_for(question.id))
        .filter_map(|v| v.as_str());

    match question.kind {
        QuestionKind::Choice => {
            let mut counts: Vec<OptionCount> = Vec::new();
            for value in values {
                match counts.iter_mut().find(|c| c.label == value) {
                    Some(c) => c.count += 1,
                    None => counts.push(OptionCount {
                        label: value.to_string(),
                        count: 1,
                    }),
                }
            }
            Summary::Tally { counts }
        }
        QuestionKind::Text => Summary::Answers {
            answers: values
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        },
    }
}
