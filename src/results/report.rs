//! Paginated results report.
//!
//! The layout is computed in millimetres on an A4 page, top-down: a title line, then for
//! each question a `Question: ...` line followed by one line per tallied option or
//! collected answer. Whenever the cursor moves past [`PAGE_BREAK_AT`] a new page starts.

use chrono::{DateTime, Utc};

use super::{Summary, SurveyResults};

pub const TITLE_SIZE: u32 = 18;
pub const BODY_SIZE: u32 = 12;
pub const MARGIN_X: u32 = 10;
pub const ITEM_X: u32 = 12;
pub const TITLE_Y: u32 = 20;
pub const BODY_START_Y: u32 = 30;
pub const PAGE_TOP_Y: u32 = 20;
pub const LINE_HEIGHT: u32 = 6;
pub const QUESTION_GAP: u32 = 4;
pub const PAGE_BREAK_AT: u32 = 270;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<Line>,
}

/// A line of text positioned on a page (millimetres from the top-left corner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub text: String,
}

struct Cursor {
    pages: Vec<Page>,
    y: u32,
}

impl Cursor {
    fn line(&mut self, x: u32, text: String) {
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(Line {
                x,
                y,
                size: BODY_SIZE,
                text,
            });
        }
        self.advance(LINE_HEIGHT);
    }

    fn advance(&mut self, by: u32) {
        self.y += by;
        if self.y > PAGE_BREAK_AT {
            self.pages.push(Page::default());
            self.y = PAGE_TOP_Y;
        }
    }
}

impl Report {
    pub fn build(results: &SurveyResults, generated_at: DateTime<Utc>) -> Self {
        let title = format!("Survey results: {}", results.title);
        let first = Page {
            lines: vec![Line {
                x: MARGIN_X,
                y: TITLE_Y,
                size: TITLE_SIZE,
                text: title.clone(),
            }],
        };
        let mut cursor = Cursor {
            pages: vec![first],
            y: BODY_START_Y,
        };

        for result in &results.questions {
            cursor.line(MARGIN_X, format!("Question: {}", result.question.text));
            match &result.summary {
                Summary::Tally { counts } => {
                    for c in counts {
                        cursor.line(ITEM_X, format!("- {}: {}", c.label, c.count));
                    }
                }
                Summary::Answers { answers } => {
                    for answer in answers {
                        cursor.line(ITEM_X, format!("- {}", answer));
                    }
                }
            }
            cursor.advance(QUESTION_GAP);
        }

        // A break right after the last line leaves an empty trailing page.
        if cursor.pages.len() > 1 && cursor.pages.last().is_some_and(|p| p.lines.is_empty()) {
            cursor.pages.pop();
        }

        Self {
            title,
            generated_at,
            pages: cursor.pages,
        }
    }

    /// Plain-text rendering for the terminal, one block per page.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push_str(&format!("\n--- page {} ---\n", i + 1));
            }
            for line in &page.lines {
                if line.x > MARGIN_X {
                    out.push_str("  ");
                }
                out.push_str(&line.text);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuestionId, QuestionKind, SurveyId};
    use crate::results::{OptionCount, QuestionResult};

    fn results(answers: usize) -> SurveyResults {
        SurveyResults {
            survey_id: SurveyId(1),
            title: "Lunch".to_string(),
            response_count: answers,
            questions: vec![
                QuestionResult {
                    question: Question {
                        id: QuestionId(1),
                        text: "Pizza or Salad?".to_string(),
                        kind: QuestionKind::Choice,
                        options: vec!["Pizza".to_string(), "Salad".to_string()],
                    },
                    summary: Summary::Tally {
                        counts: vec![OptionCount {
                            label: "Pizza".to_string(),
                            count: 2,
                        }],
                    },
                },
                QuestionResult {
                    question: Question {
                        id: QuestionId(2),
                        text: "Why?".to_string(),
                        kind: QuestionKind::Text,
                        options: vec![],
                    },
                    summary: Summary::Answers {
                        answers: (0..answers).map(|i| format!("reason {}", i)).collect(),
                    },
                },
            ],
        }
    }

    #[test]
    fn test_short_report_fits_one_page() {
        let report = Report::build(&results(2), Utc::now());
        assert_eq!(report.pages.len(), 1);
        let lines = &report.pages[0].lines;
        assert_eq!(lines[0].text, "Survey results: Lunch");
        assert_eq!(lines[0].size, TITLE_SIZE);
        assert_eq!((lines[1].x, lines[1].y), (MARGIN_X, 30));
        assert_eq!(lines[2].text, "- Pizza: 2");
        assert_eq!((lines[2].x, lines[2].y), (ITEM_X, 36));
        // 30, 36, then a 4mm gap: the next question starts at 46.
        assert_eq!(lines[3].text, "Question: Why?");
        assert_eq!(lines[3].y, 46);
    }

    #[test]
    fn test_long_report_breaks_pages() {
        let report = Report::build(&results(60), Utc::now());
        assert!(report.pages.len() > 1);
        for page in &report.pages {
            assert!(!page.lines.is_empty());
            assert!(page.lines.iter().all(|l| l.y <= PAGE_BREAK_AT));
        }
        assert_eq!(report.pages[1].lines[0].y, PAGE_TOP_Y);

        let total: usize = report.pages.iter().map(|p| p.lines.len()).sum();
        // title + 2 question lines + 1 tally line + 60 answers
        assert_eq!(total, 64);
    }

    #[test]
    fn test_render_text_indents_items() {
        let report = Report::build(&results(1), Utc::now());
        let text = report.render_text();
        assert_eq!(
            text,
            "Survey results: Lunch\nQuestion: Pizza or Salad?\n  - Pizza: 2\nQuestion: Why?\n  - reason 0\n"
        );
    }
}
