//! CSV export: one row per answer, every field quoted.

use std::path::{Path, PathBuf};

use ::csv::{QuoteStyle, WriterBuilder};
use anyhow::{Context, Result};

use crate::models::{Response, Survey, SurveyId};

pub const HEADER: [&str; 2] = ["Question", "Answer"];

pub fn file_name(survey_id: SurveyId) -> String {
    format!("survey-{}-results.csv", survey_id)
}

/// Render every answer of every response as a `"Question","Answer"` row.
///
/// Rows follow response order, then answer order within a response. Questions are
/// looked up by id; an answer to an unknown question gets an empty question column.
pub fn to_csv<'a, I>(survey: &Survey, responses: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Response>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for response in responses.into_iter().filter(|r| r.survey_id == survey.id) {
        for answer in &response.answers {
            let question = survey
                .question(answer.question_id)
                .map(|q| q.text.as_str())
                .unwrap_or("");
            writer.write_record([question, answer.value.to_text().as_str()])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

/// Write the CSV export into `dir` and return the file path.
pub fn export<'a, I>(survey: &Survey, responses: I, dir: &Path) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a Response>,
{
    let content = to_csv(survey, responses)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(file_name(survey.id));
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Exported CSV for survey {} to {}", survey.id, path.display());
    Ok(path)
}
