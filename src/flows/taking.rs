use thiserror::Error;

use crate::models::{Answer, Question, QuestionId, Response, Survey, SurveyId};
use crate::routes::Route;
use crate::store::SurveyStore;
use crate::validation::{is_blank, FieldError, ValidationErrors};

use super::{SubmitError, Submitted};

/// Rejected answer input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("Question {0} is not part of this survey")]
    UnknownQuestion(QuestionId),

    #[error("{value:?} is not an option of question {question_id}")]
    NotAnOption {
        question_id: QuestionId,
        value: String,
    },
}

/// One response being filled in. Every question requires an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseForm {
    survey: Survey,
    answers: Vec<Option<String>>,
}

impl ResponseForm {
    /// Start a response to `survey_id`, or `None` when the survey does not exist.
    pub fn open(store: &SurveyStore, survey_id: SurveyId) -> Option<Self> {
        let survey = store.get_survey(survey_id)?.clone();
        Some(Self::for_survey(survey))
    }

    pub fn for_survey(survey: Survey) -> Self {
        let answers = vec![None; survey.questions.len()];
        Self { survey, answers }
    }

    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    pub fn questions(&self) -> &[Question] {
        &self.survey.questions
    }

    /// Set the answer to a question. Choice questions only accept one of their options.
    pub fn answer(
        &mut self,
        question_id: QuestionId,
        value: impl Into<String>,
    ) -> Result<(), AnswerError> {
        let index = self
            .index_of(question_id)
            .ok_or(AnswerError::UnknownQuestion(question_id))?;
        let value = value.into();
        let question = &self.survey.questions[index];
        if question.is_choice() && !question.has_option(&value) {
            return Err(AnswerError::NotAnOption { question_id, value });
        }
        self.answers[index] = Some(value);
        Ok(())
    }

    /// Build the response, or report every unanswered question.
    pub fn validate(&self) -> Result<Response, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let mut answers = Vec::with_capacity(self.answers.len());
        for (question, value) in self.survey.questions.iter().zip(&self.answers) {
            match value {
                Some(v) if !is_blank(v) => answers.push(Answer::new(question.id, v.as_str())),
                _ => errors.push(FieldError::required(format!("answers.{}", question.id))),
            }
        }
        errors.into_result()?;
        Ok(Response {
            survey_id: self.survey.id,
            answers,
        })
    }

    /// Validate the form and record the response in `store`.
    pub fn submit(&self, store: &mut SurveyStore) -> Result<Submitted<Response>, SubmitError> {
        let response = self.validate().inspect_err(|errors| {
            tracing::warn!("Response to survey {} not submitted: {}", self.survey.id, errors);
        })?;
        store.add_response(response.clone())?;
        Ok(Submitted {
            value: response,
            notice: "Thanks for your response",
            next: Route::SurveyList,
        })
    }

    fn index_of(&self, question_id: QuestionId) -> Option<usize> {
        self.survey
            .questions
            .iter()
            .position(|q| q.id == question_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;

    fn survey() -> Survey {
        Survey {
            id: SurveyId(1),
            title: "Lunch".to_string(),
            description: None,
            questions: vec![
                Question {
                    id: QuestionId(1),
                    text: "Pizza or Salad?".to_string(),
                    kind: QuestionKind::Choice,
                    options: vec!["Pizza".to_string(), "Salad".to_string()],
                },
                Question {
                    id: QuestionId(2),
                    text: "Why?".to_string(),
                    kind: QuestionKind::Text,
                    options: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_choice_answer_must_be_an_option() {
        let mut form = ResponseForm::for_survey(survey());
        let err = form.answer(QuestionId(1), "Soup").unwrap_err();
        assert!(matches!(err, AnswerError::NotAnOption { .. }));
        assert!(form.validate().unwrap_err().contains("answers.1"));

        form.answer(QuestionId(1), "Salad").unwrap();
        assert!(!form.validate().unwrap_err().contains("answers.1"));
    }

    #[test]
    fn test_unknown_question_is_rejected() {
        let mut form = ResponseForm::for_survey(survey());
        assert_eq!(
            form.answer(QuestionId(7), "x"),
            Err(AnswerError::UnknownQuestion(QuestionId(7)))
        );
    }

    #[test]
    fn test_every_answer_is_required() {
        let mut form = ResponseForm::for_survey(survey());
        form.answer(QuestionId(2), "  ").unwrap();

        let errors = form.validate().unwrap_err();
        assert!(errors.contains("answers.1"));
        assert!(errors.contains("answers.2"));
    }

    #[test]
    fn test_response_pairs_answers_in_question_order() {
        let mut form = ResponseForm::for_survey(survey());
        form.answer(QuestionId(2), "Cheap").unwrap();
        form.answer(QuestionId(1), "Pizza").unwrap();

        let response = form.validate().unwrap();
        assert_eq!(response.survey_id, SurveyId(1));
        assert_eq!(
            response.answers,
            vec![
                Answer::new(QuestionId(1), "Pizza"),
                Answer::new(QuestionId(2), "Cheap"),
            ]
        );
    }
}
