use std::collections::HashSet;

use speculate2::speculate;
use surveyor::db::Database;
use surveyor::models::*;
use surveyor::store::*;

fn lunch() -> NewSurvey {
    NewSurvey {
        title: "Lunch".to_string(),
        description: Some("Team lunch poll".to_string()),
        questions: vec![
            NewQuestion::choice("Pizza or Salad?", ["Pizza", "Salad"]),
            NewQuestion::text("Anything else?"),
        ],
    }
}

fn open_file(path: &std::path::Path) -> Database {
    let db = Database::open(path.to_path_buf()).expect("Failed to open database");
    db.migrate().expect("Failed to run migrations");
    db
}

speculate! {
    describe "in memory" {
        before {
            let db = Database::open_memory().expect("Failed to create in-memory database");
            db.migrate().expect("Failed to run migrations");
            let mut store = SurveyStore::load(db.clone()).expect("Failed to load store");
        }

        describe "add_survey" {
            it "assigns ids never used before" {
                let mut seen = HashSet::new();
                let mut last_survey = 0;
                for _ in 0..5 {
                    let survey = store.add_survey(lunch()).expect("Failed to add survey");
                    assert!(survey.id.0 > last_survey);
                    last_survey = survey.id.0;
                    for q in &survey.questions {
                        assert!(seen.insert(q.id), "question id {} reused", q.id);
                    }
                }
                assert_eq!(seen.len(), 10);
            }

            it "returns the stored survey from get_survey" {
                let created = store.add_survey(lunch()).expect("Failed to add survey");
                let found = store.get_survey(created.id).expect("Survey not found");
                assert_eq!(*found, created);
                assert_eq!(found.description.as_deref(), Some("Team lunch poll"));
                assert_eq!(found.questions[0].options, vec!["Pizza", "Salad"]);
            }

            it "returns None for an unknown id" {
                let created = store.add_survey(lunch()).expect("Failed to add survey");
                assert!(store.get_survey(SurveyId(created.id.0 + 1)).is_none());
            }

            it "keeps creation order" {
                let first = store.add_survey(lunch()).expect("Failed");
                let mut second_input = lunch();
                second_input.title = "Dinner".to_string();
                let second = store.add_survey(second_input).expect("Failed");

                let ids: Vec<_> = store.surveys().iter().map(|s| s.id).collect();
                assert_eq!(ids, vec![first.id, second.id]);
            }
        }

        describe "responses" {
            it "filters by survey and preserves submission order" {
                let a = store.add_survey(lunch()).expect("Failed");
                let b = store.add_survey(lunch()).expect("Failed");

                for (survey, choice) in [(&a, "Pizza"), (&b, "Salad"), (&a, "Salad")] {
                    store.add_response(Response {
                        survey_id: survey.id,
                        answers: vec![Answer::new(survey.questions[0].id, choice)],
                    }).expect("Failed to add response");
                }

                let responses = store.responses_for_survey(a.id);
                let choices: Vec<_> = responses
                    .iter()
                    .map(|r| r.answers[0].value.to_text())
                    .collect();
                assert_eq!(choices, vec!["Pizza", "Salad"]);
                assert_eq!(store.response_count(b.id), 1);
            }
        }

        describe "persistence" {
            it "writes the full catalog on every append" {
                store.add_survey(lunch()).expect("Failed");
                store.add_survey(lunch()).expect("Failed");

                let raw = db.get_item(surveyor::db::SURVEYS_KEY).expect("Query failed").expect("Nothing stored");
                let stored: Vec<Survey> = serde_json::from_str(&raw).expect("Invalid JSON");
                assert_eq!(stored.len(), 2);
            }
        }
    }

    describe "on disk" {
        it "survives reopening the database file" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("surveyor.db");

            let first_id = {
                let mut store = SurveyStore::load(open_file(&path)).expect("Failed to load");
                let survey = store.add_survey(lunch()).expect("Failed");
                store.add_response(Response {
                    survey_id: survey.id,
                    answers: vec![Answer::new(survey.questions[0].id, "Pizza")],
                }).expect("Failed");
                let mut session = SessionStore::load(open_file(&path)).expect("Failed to load");
                session.log_in("alice", "pw").expect("Failed to log in");
                survey.id
            };

            let mut reopened = SurveyStore::load(open_file(&path)).expect("Failed to reload");
            assert!(reopened.get_survey(first_id).is_some());
            assert_eq!(reopened.response_count(first_id), 1);

            let next = reopened.add_survey(lunch()).expect("Failed");
            assert_eq!(next.id, SurveyId(first_id.0 + 1));
            assert_eq!(next.questions[0].id, QuestionId(3));

            let session = SessionStore::load(open_file(&path)).expect("Failed to reload");
            assert_eq!(session.current_user(), Some("alice"));
        }
    }
}
