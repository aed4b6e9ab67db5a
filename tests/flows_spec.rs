use speculate2::speculate;
use surveyor::db::Database;
use surveyor::flows::*;
use surveyor::models::*;
use surveyor::routes::Route;
use surveyor::store::SurveyStore;

fn filled_draft() -> SurveyDraft {
    let mut draft = SurveyDraft::new();
    draft.set_title("Lunch");
    draft.set_question_text(0, "Pizza or Salad?");
    draft.set_kind(0, QuestionKind::Choice);
    draft.set_option_text(0, 0, "Pizza");
    draft.set_option_text(0, 1, "Salad");
    let q = draft.add_question();
    draft.set_question_text(q, "Anything else?");
    draft
}

speculate! {
    describe "drafts" {
        it "strips options left on a question switched back to text" {
            let mut draft = filled_draft();
            draft.set_kind(0, QuestionKind::Text);

            let definition = draft.validate().expect("Draft should be valid");
            assert!(definition.questions[0].options.is_empty());
        }

        it "keeps list lengths when removing the last question or option" {
            let mut draft = SurveyDraft::new();
            draft.remove_question(0);
            assert_eq!(draft.questions().len(), 1);

            draft.set_kind(0, QuestionKind::Choice);
            draft.remove_option(0, 0);
            draft.remove_option(0, 0);
            assert_eq!(draft.questions()[0].options.len(), 1);
        }
    }

    describe "submitting" {
        before {
            let db = Database::open_memory().expect("Failed to create in-memory database");
            db.migrate().expect("Failed to run migrations");
            let mut store = SurveyStore::load(db).expect("Failed to load store");
        }

        describe "authoring" {
            it "submits a valid draft and navigates to the list" {
                let submitted = filled_draft().submit(&mut store).expect("Failed to submit");

                assert_eq!(submitted.notice, "Survey created");
                assert_eq!(submitted.next, Route::SurveyList);
                let survey = store.get_survey(submitted.value.id).expect("Survey not stored");
                assert_eq!(survey.questions.len(), 2);
                assert_eq!(survey.questions[0].kind, QuestionKind::Choice);
                assert!(survey.questions[1].options.is_empty());
            }

            it "does not submit an invalid draft" {
                let mut draft = filled_draft();
                draft.set_option_text(0, 1, "");

                let err = draft.submit(&mut store).unwrap_err();
                let errors = err.validation().expect("Expected a validation error");
                assert!(errors.contains("questions[0].options[1]"));
                assert!(store.surveys().is_empty());
            }
        }

        describe "taking" {
            before {
                let survey = filled_draft().submit(&mut store).expect("Failed to submit").value;
            }

            it "opens existing surveys only and records a complete response" {
                assert!(ResponseForm::open(&store, SurveyId(survey.id.0 + 1)).is_none());
                let mut form = ResponseForm::open(&store, survey.id).expect("Survey not found");
                form.answer(survey.questions[0].id, "Salad").expect("Failed to answer");
                form.answer(survey.questions[1].id, "No nuts please").expect("Failed to answer");

                let submitted = form.submit(&mut store).expect("Failed to submit");
                assert_eq!(submitted.notice, "Thanks for your response");
                assert_eq!(submitted.next, Route::SurveyList);

                let responses = store.responses_for_survey(survey.id);
                assert_eq!(responses.len(), 1);
                assert_eq!(*responses[0], submitted.value);
            }

            it "rejects a response with a missing answer" {
                let mut form = ResponseForm::open(&store, survey.id).expect("Survey not found");
                form.answer(survey.questions[0].id, "Pizza").expect("Failed to answer");

                let err = form.submit(&mut store).unwrap_err();
                let errors = err.validation().expect("Expected a validation error");
                assert!(errors.contains(&format!("answers.{}", survey.questions[1].id)));
                assert_eq!(store.response_count(survey.id), 0);
            }
        }
    }
}
