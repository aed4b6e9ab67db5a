//! Navigation surface.
//!
//! Paths follow the browser layout of the application:
//!
//! ```text
//! login                  Login
//! surveys                SurveyList
//! surveys/new            CreateSurvey
//! surveys/{id}           TakeSurvey
//! surveys/{id}/results   Results
//! ```
//!
//! The empty path and anything unrecognised land on the survey list.

use std::fmt;

use crate::models::SurveyId;
use crate::store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    SurveyList,
    CreateSurvey,
    TakeSurvey(SurveyId),
    Results(SurveyId),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["login"] => Self::Login,
            ["surveys", "new"] => Self::CreateSurvey,
            ["surveys", id] => match parse_id(id) {
                Some(id) => Self::TakeSurvey(id),
                None => Self::SurveyList,
            },
            ["surveys", id, "results"] => match parse_id(id) {
                Some(id) => Self::Results(id),
                None => Self::SurveyList,
            },
            _ => Self::SurveyList,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::SurveyList => "/surveys".to_string(),
            Self::CreateSurvey => "/surveys/new".to_string(),
            Self::TakeSurvey(id) => format!("/surveys/{}", id),
            Self::Results(id) => format!("/surveys/{}/results", id),
        }
    }

    /// Every route except the login view requires an authenticated session.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Redirect unauthenticated access to protected routes to the login view.
pub fn guard(route: Route, session: &SessionStore) -> Route {
    if route.is_protected() && !session.is_authenticated() {
        tracing::debug!("Redirecting {} to login", route);
        Route::Login
    } else {
        route
    }
}

/// Survey ids start at 1, so `0` is never a valid id.
fn parse_id(segment: &str) -> Option<SurveyId> {
    match segment.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(SurveyId(id)),
    }
}
