//! Form validation errors shared by the authoring and taking flows.

use std::fmt;

use serde::Serialize;

use crate::models::{NewSurvey, QuestionKind};

/// A single invalid field, addressed by a path such as `questions[1].options[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn required(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: "is required".to_string(),
        }
    }
}

/// Every invalid field found while validating a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.fields.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{} {}", e.field, e.message))
            .collect();
        write!(f, "invalid form: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

impl NewSurvey {
    /// Check that the title, every question text and every option of a choice
    /// question are filled in, and that choice questions have at least one option.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if is_blank(&self.title) {
            errors.push(FieldError::required("title"));
        }
        if self.questions.is_empty() {
            errors.push(FieldError {
                field: "questions".to_string(),
                message: "must contain at least one question".to_string(),
            });
        }
        for (i, question) in self.questions.iter().enumerate() {
            if is_blank(&question.text) {
                errors.push(FieldError::required(format!("questions[{}].text", i)));
            }
            match question.kind {
                QuestionKind::Choice => {
                    if question.options.is_empty() {
                        errors.push(FieldError {
                            field: format!("questions[{}].options", i),
                            message: "must contain at least one option".to_string(),
                        });
                    }
                    for (j, option) in question.options.iter().enumerate() {
                        if is_blank(option) {
                            errors.push(FieldError::required(format!(
                                "questions[{}].options[{}]",
                                i, j
                            )));
                        }
                    }
                }
                QuestionKind::Text => {
                    if !question.options.is_empty() {
                        errors.push(FieldError {
                            field: format!("questions[{}].options", i),
                            message: "only choice questions have options".to_string(),
                        });
                    }
                }
            }
        }
        errors.into_result()
    }
}
