use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use surveyor::app::{App, View};
use surveyor::config::Config;
use surveyor::db::Database;
use surveyor::flows::{ResponseForm, SubmitError, SurveyDraft};
use surveyor::models::{QuestionKind, SurveyId};
use surveyor::results::{self, report::Report, Summary, SurveyResults};
use surveyor::routes::Route;
use surveyor::store::AuthError;

#[derive(Parser)]
#[command(name = "surveyor")]
#[command(about = "Author surveys, collect responses and export results")]
struct Cli {
    /// Database file (overrides config and SURVEYOR_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a session
    Login { username: String, password: String },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List surveys
    List,
    /// Create a survey
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Question, in order. "text" is free-text, "text | option | option" is single-choice
        #[arg(short = 'q', long = "question", required = true)]
        questions: Vec<String>,
    },
    /// Show a survey's questions
    Show { id: u64 },
    /// Answer a survey
    Take {
        id: u64,

        /// Answer, one per question in order
        #[arg(short = 'a', long = "answer")]
        answers: Vec<String>,
    },
    /// Show aggregated results
    Results {
        id: u64,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export results to a file
    Export {
        id: u64,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output directory (overrides config and SURVEYOR_EXPORT_DIR)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Resolve a route path, e.g. /surveys/1/results
    Open { path: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Pdf,
}

/// Initialize tracing on stderr so stdout only carries command output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "surveyor=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::load();
    let db_path = match cli.db {
        Some(path) => path,
        None => config.database_path()?,
    };
    let db = Database::open(db_path).context("Failed to open database")?;
    let mut app = App::load(db)?;

    match cli.command {
        Commands::Login { username, password } => {
            match app.session.log_in(&username, &password) {
                Ok(()) => println!("Logged in as {}", username),
                Err(AuthError::InvalidCredentials) => anyhow::bail!("Invalid credentials"),
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Logout => {
            app.session.log_out()?;
            println!("Logged out");
        }
        Commands::Whoami => match app.session.current_user() {
            Some(user) => println!("{}", user),
            None => println!("Not logged in"),
        },
        Commands::List => {
            let View::SurveyList(surveys) = app.open(Route::SurveyList) else {
                return Err(not_logged_in());
            };
            if surveys.is_empty() {
                println!("No surveys yet");
            }
            for survey in surveys {
                println!(
                    "{:>4}  {}  ({} responses)",
                    survey.id,
                    survey.title,
                    app.surveys.response_count(survey.id)
                );
            }
        }
        Commands::Create {
            title,
            description,
            questions,
        } => {
            let mut draft = match app.open(Route::CreateSurvey) {
                View::CreateSurvey(draft) => draft,
                view => return Err(redirected(&view)),
            };
            fill_draft(&mut draft, &title, description.as_deref(), &questions);
            let submitted = draft.submit(&mut app.surveys).map_err(report_submit_error)?;
            println!("{} (id {})", submitted.notice, submitted.value.id);
        }
        Commands::Show { id } => {
            let form = match app.open(Route::TakeSurvey(SurveyId(id))) {
                View::TakeSurvey(form) => form,
                view => return Err(redirected(&view)),
            };
            print_survey(&form);
        }
        Commands::Take { id, answers } => {
            let mut form = match app.open(Route::TakeSurvey(SurveyId(id))) {
                View::TakeSurvey(form) => form,
                view => return Err(redirected(&view)),
            };
            if answers.len() > form.questions().len() {
                anyhow::bail!(
                    "Survey {} has {} questions but {} answers were given",
                    id,
                    form.questions().len(),
                    answers.len()
                );
            }
            let ids: Vec<_> = form.questions().iter().map(|q| q.id).collect();
            for (question_id, answer) in ids.into_iter().zip(answers) {
                form.answer(question_id, answer)?;
            }
            let submitted = form.submit(&mut app.surveys).map_err(report_submit_error)?;
            println!("{}", submitted.notice);
        }
        Commands::Results { id, json } => {
            let results = match app.open(Route::Results(SurveyId(id))) {
                View::Results(results) => results,
                view => return Err(redirected(&view)),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_results(&results);
            }
        }
        Commands::Export { id, format, out } => {
            let results = match app.open(Route::Results(SurveyId(id))) {
                View::Results(results) => results,
                view => return Err(redirected(&view)),
            };
            let dir = out.unwrap_or(config.export_dir);
            let path = match format {
                ExportFormat::Csv => {
                    let survey = app
                        .surveys
                        .get_survey(results.survey_id)
                        .context("Survey disappeared while exporting")?;
                    results::csv::export(survey, app.surveys.responses_for_survey(survey.id), &dir)?
                }
                ExportFormat::Pdf => {
                    let report = Report::build(&results, chrono::Utc::now());
                    results::pdf::export(&report, results.survey_id, &dir)?
                }
            };
            println!("Wrote {}", path.display());
        }
        Commands::Open { path } => {
            let view = app.navigate(&path);
            println!("{}", view.route());
            match view {
                View::Login => println!("Log in with: surveyor login <username> <password>"),
                View::SurveyList(surveys) => println!("{} surveys", surveys.len()),
                View::CreateSurvey(_) => println!("Create with: surveyor create --title <title> -q <question>"),
                View::TakeSurvey(form) => print_survey(&form),
                View::Results(results) => print_results(&results),
            }
        }
    }

    Ok(())
}

/// Apply `--title`, `--description` and `-q` specs to a fresh draft.
fn fill_draft(draft: &mut SurveyDraft, title: &str, description: Option<&str>, specs: &[String]) {
    draft.set_title(title);
    if let Some(description) = description {
        draft.set_description(description);
    }
    for (i, spec) in specs.iter().enumerate() {
        let index = if i == 0 { 0 } else { draft.add_question() };
        let mut parts = spec.split('|').map(str::trim);
        draft.set_question_text(index, parts.next().unwrap_or_default());

        let options: Vec<&str> = parts.collect();
        if options.is_empty() {
            continue;
        }
        draft.set_kind(index, QuestionKind::Choice);
        for (j, option) in options.iter().enumerate() {
            if j >= draft.questions()[index].options.len() {
                draft.add_option(index);
            }
            draft.set_option_text(index, j, *option);
        }
        // A single option leaves the second seeded slot empty.
        while draft.questions()[index].options.len() > options.len() {
            let last = draft.questions()[index].options.len() - 1;
            draft.remove_option(index, last);
        }
    }
}

fn print_survey(form: &ResponseForm) {
    let survey = form.survey();
    println!("{}: {}", survey.id, survey.title);
    if let Some(description) = &survey.description {
        println!("{}", description);
    }
    for (i, question) in form.questions().iter().enumerate() {
        println!("{}. {} [{}]", i + 1, question.text, question.kind.as_str());
        for option in &question.options {
            println!("   ( ) {}", option);
        }
    }
}

fn print_results(results: &SurveyResults) {
    println!(
        "{}: {} ({} responses)",
        results.survey_id, results.title, results.response_count
    );
    for result in &results.questions {
        println!("{}", result.question.text);
        match &result.summary {
            Summary::Tally { counts } => {
                for c in counts {
                    println!("  {}: {}", c.label, c.count);
                }
            }
            Summary::Answers { answers } => {
                for answer in answers {
                    println!("  - {}", answer);
                }
            }
        }
    }
}

fn not_logged_in() -> anyhow::Error {
    anyhow::anyhow!("Not logged in. Run `surveyor login <username> <password>` first")
}

fn redirected(view: &View<'_>) -> anyhow::Error {
    match view {
        View::Login => not_logged_in(),
        _ => anyhow::anyhow!("Survey not found"),
    }
}

fn report_submit_error(e: SubmitError) -> anyhow::Error {
    if let Some(errors) = e.validation() {
        for field in &errors.fields {
            eprintln!("  {} {}", field.field, field.message);
        }
    }
    e.into()
}
