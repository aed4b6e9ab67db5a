//! Application shell: wires the stores together and resolves navigation to views.

use anyhow::Result;

use crate::db::Database;
use crate::flows::{ResponseForm, SurveyDraft};
use crate::models::Survey;
use crate::results::SurveyResults;
use crate::routes::{self, Route};
use crate::store::{SessionStore, SurveyStore};

/// What a route shows once guards and redirects have been applied.
#[derive(Debug)]
pub enum View<'a> {
    Login,
    SurveyList(&'a [Survey]),
    CreateSurvey(SurveyDraft),
    TakeSurvey(ResponseForm),
    Results(SurveyResults),
}

impl View<'_> {
    /// The route this view corresponds to.
    pub fn route(&self) -> Route {
        match self {
            Self::Login => Route::Login,
            Self::SurveyList(_) => Route::SurveyList,
            Self::CreateSurvey(_) => Route::CreateSurvey,
            Self::TakeSurvey(form) => Route::TakeSurvey(form.survey().id),
            Self::Results(results) => Route::Results(results.survey_id),
        }
    }
}

/// The session and survey stores, built once over the same database.
pub struct App {
    pub session: SessionStore,
    pub surveys: SurveyStore,
}

impl App {
    pub fn load(db: Database) -> Result<Self> {
        db.migrate()?;
        Ok(Self {
            session: SessionStore::load(db.clone())?,
            surveys: SurveyStore::load(db)?,
        })
    }

    /// Resolve `path` to a view.
    ///
    /// Protected routes redirect to the login view without a session, and a survey
    /// id that does not exist redirects to the survey list.
    pub fn navigate(&self, path: &str) -> View<'_> {
        self.open(Route::parse(path))
    }

    pub fn open(&self, route: Route) -> View<'_> {
        match routes::guard(route, &self.session) {
            Route::Login => View::Login,
            Route::SurveyList => View::SurveyList(self.surveys.surveys()),
            Route::CreateSurvey => View::CreateSurvey(SurveyDraft::new()),
            Route::TakeSurvey(id) => match ResponseForm::open(&self.surveys, id) {
                Some(form) => View::TakeSurvey(form),
                None => self.missing(route),
            },
            Route::Results(id) => match self.surveys.get_survey(id) {
                Some(survey) => View::Results(SurveyResults::compute(
                    survey,
                    self.surveys.responses_for_survey(id),
                )),
                None => self.missing(route),
            },
        }
    }

    fn missing(&self, route: Route) -> View<'_> {
        tracing::debug!("No survey for {}, showing the survey list", route);
        View::SurveyList(self.surveys.surveys())
    }
}
