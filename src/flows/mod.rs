//! Interactive flows that write to the survey store.
//!
//! - [`SurveyDraft`]: builds a new survey from user edits.
//! - [`ResponseForm`]: collects one response to an existing survey.
//!
//! A successful submission returns a [`Submitted`] outcome telling the caller what to
//! show the user and where to navigate next.

mod authoring;
mod taking;

pub use authoring::*;
pub use taking::*;

use thiserror::Error;

use crate::routes::Route;
use crate::store::StoreError;
use crate::validation::ValidationErrors;

/// Result of a successful form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted<T> {
    pub value: T,
    /// Short message for the user.
    pub notice: &'static str,
    /// Where to navigate after submitting.
    pub next: Route,
}

/// Why a form could not be submitted.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// The invalid fields, when the form itself was the problem.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Store(StoreError::Invalid(errors)) => Some(errors),
            Self::Store(_) => None,
        }
    }
}
