//! PDF rendering of a [`Report`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::report::{Line, Report};
use crate::models::SurveyId;

/// A4 in PDF points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const FONT_NAME: &[u8] = b"F1";

pub fn file_name(survey_id: SurveyId) -> String {
    format!("survey-{}-results.pdf", survey_id)
}

fn mm_to_pt(mm: u32) -> i64 {
    (f64::from(mm) * 72.0 / 25.4).round() as i64
}

/// Encode text for a WinAnsiEncoding font. Characters outside the encoding become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

fn line_ops(line: &Line) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(FONT_NAME.to_vec()),
                Object::Integer(i64::from(line.size)),
            ],
        ),
        Operation::new(
            "Td",
            vec![
                Object::Integer(mm_to_pt(line.x)),
                Object::Integer(PAGE_HEIGHT - mm_to_pt(line.y)),
            ],
        ),
        Operation::new(
            "Tj",
            vec![Object::String(win_ansi(&line.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Render the report as a PDF document, one PDF page per report page.
pub fn to_pdf(report: &Report) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(report.pages.len());
    for page in &report.pages {
        let content: Content = Content {
            operations: page.lines.iter().flat_map(line_ops).collect(),
        };
        let encoded = content
            .encode()
            .map_err(|e| anyhow::anyhow!("Failed to encode page content: {}", e))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(win_ansi(&report.title), StringFormat::Literal),
        "CreationDate" => Object::string_literal(
            report.generated_at.format("D:%Y%m%d%H%M%SZ").to_string()
        ),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| anyhow::anyhow!("Failed to write PDF: {}", e))?;
    Ok(bytes)
}

/// Write the PDF export into `dir` and return the file path.
pub fn export(report: &Report, survey_id: SurveyId, dir: &Path) -> Result<PathBuf> {
    let bytes = to_pdf(report)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(file_name(survey_id));
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(
        "Exported {}-page PDF for survey {} to {}",
        report.pages.len(),
        survey_id,
        path.display()
    );
    Ok(path)
}
