//! Domain models for surveyor.
//!
//! # Core Concepts
//!
//! - [`Survey`]: A titled, ordered list of [`Question`]s. Immutable once created.
//! - [`Question`]: Either free-text or single-choice (with options).
//! - [`Response`]: One respondent's [`Answer`]s to a survey.
//!
//! Surveys and responses are append-only: nothing is edited or deleted after creation.

mod response;
mod survey;

pub use response::*;
pub use survey::*;
