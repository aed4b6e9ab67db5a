use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::db::{Database, RESPONSES_KEY, SURVEYS_KEY};
use crate::models::*;
use crate::validation::ValidationErrors;

/// Survey store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("Survey {0} not found")]
    UnknownSurvey(SurveyId),

    #[error("Question {question_id} does not belong to survey {survey_id}")]
    UnknownQuestion {
        survey_id: SurveyId,
        question_id: QuestionId,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// A change to the store, delivered to subscribers after it has been persisted.
#[derive(Debug, Clone, Copy)]
pub enum StoreEvent<'a> {
    SurveyAdded(&'a Survey),
    ResponseAdded(&'a Response),
}

/// Handle returned by [`SurveyStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StoreEvent<'_>)>;

/// Owns the survey catalog and the submitted responses.
///
/// Both lists are loaded once from storage and written back in full after every
/// append. Identifiers come from counters seeded with the largest ids found in the
/// stored catalog, so they keep increasing across restarts.
pub struct SurveyStore {
    db: Database,
    surveys: Vec<Survey>,
    responses: Vec<Response>,
    last_survey_id: u64,
    last_question_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl SurveyStore {
    pub fn load(db: Database) -> Result<Self> {
        let surveys: Vec<Survey> =
            read_list(&db, SURVEYS_KEY).context("Failed to load stored surveys")?;
        let responses: Vec<Response> =
            read_list(&db, RESPONSES_KEY).context("Failed to load stored responses")?;

        let last_survey_id = surveys.iter().map(|s| s.id.0).max().unwrap_or(0);
        let last_question_id = surveys
            .iter()
            .filter_map(|s| s.max_question_id())
            .map(|id| id.0)
            .max()
            .unwrap_or(0);

        tracing::debug!(
            "Loaded {} surveys and {} responses",
            surveys.len(),
            responses.len()
        );

        Ok(Self {
            db,
            surveys,
            responses,
            last_survey_id,
            last_question_id,
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    // ============================================================
    // Surveys
    // ============================================================

    pub fn surveys(&self) -> &[Survey] {
        &self.surveys
    }

    pub fn get_survey(&self, id: SurveyId) -> Option<&Survey> {
        self.surveys.iter().find(|s| s.id == id)
    }

    /// Assign identifiers to `input`, append it to the catalog and persist the catalog.
    pub fn add_survey(&mut self, input: NewSurvey) -> Result<Survey, StoreError> {
        input.validate()?;

        let mut question_id = self.last_question_id;
        let survey = Survey {
            id: SurveyId(self.last_survey_id + 1),
            title: input.title,
            description: input.description,
            questions: input
                .questions
                .into_iter()
                .map(|q| {
                    question_id += 1;
                    Question {
                        id: QuestionId(question_id),
                        text: q.text,
                        kind: q.kind,
                        options: q.options,
                    }
                })
                .collect(),
        };

        self.surveys.push(survey.clone());
        if let Err(e) = write_list(&self.db, SURVEYS_KEY, &self.surveys) {
            self.surveys.pop();
            return Err(e.into());
        }
        self.last_survey_id = survey.id.0;
        self.last_question_id = question_id;

        tracing::info!(
            "Created survey {} ({:?}) with {} questions",
            survey.id,
            survey.title,
            survey.questions.len()
        );
        self.notify(StoreEvent::SurveyAdded(&survey));
        Ok(survey)
    }

    // ============================================================
    // Responses
    // ============================================================

    /// Append a response and persist the response list.
    ///
    /// The response must reference an existing survey and only answer that
    /// survey's questions.
    pub fn add_response(&mut self, response: Response) -> Result<(), StoreError> {
        let survey = self
            .get_survey(response.survey_id)
            .ok_or(StoreError::UnknownSurvey(response.survey_id))?;
        if let Some(stray) = response
            .answers
            .iter()
            .find(|a| survey.question(a.question_id).is_none())
        {
            tracing::warn!(
                "Rejected response to survey {} answering question {}",
                survey.id,
                stray.question_id
            );
            return Err(StoreError::UnknownQuestion {
                survey_id: survey.id,
                question_id: stray.question_id,
            });
        }

        self.responses.push(response);
        if let Err(e) = write_list(&self.db, RESPONSES_KEY, &self.responses) {
            self.responses.pop();
            return Err(e.into());
        }

        let index = self.responses.len() - 1;
        tracing::info!("Recorded response to survey {}", self.responses[index].survey_id);

        for (_, observer) in self.observers.iter_mut() {
            observer(&StoreEvent::ResponseAdded(&self.responses[index]));
        }
        Ok(())
    }

    /// All responses to `survey_id`, in submission order.
    pub fn responses_for_survey(&self, survey_id: SurveyId) -> Vec<&Response> {
        self.responses
            .iter()
            .filter(|r| r.survey_id == survey_id)
            .collect()
    }

    pub fn response_count(&self, survey_id: SurveyId) -> usize {
        self.responses
            .iter()
            .filter(|r| r.survey_id == survey_id)
            .count()
    }

    // ============================================================
    // Subscriptions
    // ============================================================

    /// Register a callback invoked after every successful change.
    pub fn subscribe(&mut self, observer: impl FnMut(&StoreEvent<'_>) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&mut self, event: StoreEvent<'_>) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }
}

fn read_list<T: DeserializeOwned>(db: &Database, key: &str) -> Result<Vec<T>> {
    match db.get_item(key)? {
        Some(json) => serde_json::from_str(&json)
            .with_context(|| format!("Stored entry {} is not valid JSON", key)),
        None => Ok(Vec::new()),
    }
}

fn write_list<T: serde::Serialize>(db: &Database, key: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string(items)?;
    db.set_item(key, &json)
}
