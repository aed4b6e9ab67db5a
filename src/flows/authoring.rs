use crate::models::{NewQuestion, NewSurvey, QuestionKind, Survey};
use crate::routes::Route;
use crate::store::SurveyStore;
use crate::validation::{is_blank, ValidationErrors};

use super::{SubmitError, Submitted};

/// A survey being authored.
///
/// A draft always holds at least one question, and every choice question holds at
/// least one option: the remove operations refuse to go below that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyDraft {
    pub title: String,
    pub description: String,
    questions: Vec<QuestionDraft>,
}

/// A question being authored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
}

impl Default for SurveyDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyDraft {
    /// An empty draft with one empty free-text question.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            questions: vec![QuestionDraft::default()],
        }
    }

    pub fn questions(&self) -> &[QuestionDraft] {
        &self.questions
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Append an empty free-text question and return its index.
    pub fn add_question(&mut self) -> usize {
        self.questions.push(QuestionDraft::default());
        self.questions.len() - 1
    }

    /// Remove a question. Does nothing when it is the only one left.
    pub fn remove_question(&mut self, index: usize) -> bool {
        if self.questions.len() <= 1 || index >= self.questions.len() {
            return false;
        }
        self.questions.remove(index);
        true
    }

    pub fn set_question_text(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.questions.get_mut(index) {
            Some(q) => {
                q.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Change a question's kind.
    ///
    /// Switching to free-text drops all options. Switching to single-choice seeds two
    /// empty options if the question has none.
    pub fn set_kind(&mut self, index: usize, kind: QuestionKind) -> bool {
        let Some(q) = self.questions.get_mut(index) else {
            return false;
        };
        q.kind = kind;
        match kind {
            QuestionKind::Choice => {
                if q.options.is_empty() {
                    q.options = vec![String::new(), String::new()];
                }
            }
            QuestionKind::Text => q.options.clear(),
        }
        true
    }

    /// Append an empty option to a question and return its index.
    pub fn add_option(&mut self, question: usize) -> Option<usize> {
        let q = self.questions.get_mut(question)?;
        q.options.push(String::new());
        Some(q.options.len() - 1)
    }

    /// Remove an option. Does nothing when it is the only one left.
    pub fn remove_option(&mut self, question: usize, option: usize) -> bool {
        match self.questions.get_mut(question) {
            Some(q) if q.options.len() > 1 && option < q.options.len() => {
                q.options.remove(option);
                true
            }
            _ => false,
        }
    }

    pub fn set_option_text(&mut self, question: usize, option: usize, text: impl Into<String>) -> bool {
        match self
            .questions
            .get_mut(question)
            .and_then(|q| q.options.get_mut(option))
        {
            Some(o) => {
                *o = text.into();
                true
            }
            None => false,
        }
    }

    /// Turn the draft into a survey definition, or report every invalid field.
    ///
    /// Free-text questions never carry options, and a blank description becomes `None`.
    pub fn validate(&self) -> Result<NewSurvey, ValidationErrors> {
        let survey = NewSurvey {
            title: self.title.clone(),
            description: if is_blank(&self.description) {
                None
            } else {
                Some(self.description.clone())
            },
            questions: self
                .questions
                .iter()
                .map(|q| NewQuestion {
                    text: q.text.clone(),
                    kind: q.kind,
                    options: match q.kind {
                        QuestionKind::Choice => q.options.clone(),
                        QuestionKind::Text => Vec::new(),
                    },
                })
                .collect(),
        };
        survey.validate()?;
        Ok(survey)
    }

    /// Validate the draft and add it to `store`.
    pub fn submit(&self, store: &mut SurveyStore) -> Result<Submitted<Survey>, SubmitError> {
        let input = self.validate().inspect_err(|errors| {
            tracing::warn!("Survey draft not submitted: {}", errors);
        })?;
        let survey = store.add_survey(input)?;
        Ok(Submitted {
            value: survey,
            notice: "Survey created",
            next: Route::SurveyList,
        })
    }
}
