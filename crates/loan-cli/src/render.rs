//! Terminal tables and JSON reports.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use loan_feedback::SkippedRow;
use loan_inference::ModelContext;
use loan_model::{FeedbackEntry, PredictionResult, Verdict};
use loan_transform::FeatureRow;
use serde::Serialize;

use crate::session::Assessment;

/// Shown when the artifact does not record an accuracy.
const UNKNOWN_ACCURACY: &str = "not reported";

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn verdict_cell(result: &PredictionResult) -> Cell {
    let color = if result.is_approved() {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(result.headline())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn amount(value: f64) -> String {
    format!("{value:.2}")
}

fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn accuracy_cell(reported_accuracy: Option<f64>) -> Cell {
    match reported_accuracy {
        Some(accuracy) => Cell::new(percent(accuracy)),
        None => dim_cell(UNKNOWN_ACCURACY),
    }
}

/// Verdict, confidence and the applicant figures it was based on.
pub fn assessment_table(assessment: &Assessment, reported_accuracy: Option<f64>) -> Table {
    let input = &assessment.input;
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![header_cell("Assessment"), header_cell("")]);
    table.add_row(vec![Cell::new("Applicant"), Cell::new(&input.name)]);
    table.add_row(vec![Cell::new("Decision"), verdict_cell(&assessment.result)]);
    table.add_row(vec![
        Cell::new("Confidence"),
        Cell::new(format!("{:.1}%", assessment.result.confidence_percent())),
    ]);
    table.add_row(vec![
        Cell::new("Total income"),
        Cell::new(amount(input.total_income())),
    ]);
    table.add_row(vec![
        Cell::new("Loan amount"),
        Cell::new(amount(input.loan_amount)),
    ]);
    table.add_row(vec![
        Cell::new("Tenure (years)"),
        Cell::new(input.tenure_years),
    ]);
    table.add_row(vec![
        Cell::new("Model prediction accuracy"),
        accuracy_cell(reported_accuracy),
    ]);
    table
}

/// The feature row exactly as the classifier receives it.
pub fn features_table(row: &FeatureRow) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![header_cell("Feature"), header_cell("Value")]);
    for (name, value) in row.iter() {
        let cell = if value == 0.0 {
            dim_cell(value)
        } else {
            Cell::new(value)
        };
        table.add_row(vec![Cell::new(name), cell]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

/// Model name, estimator and schema columns in order.
pub fn model_table(model: &ModelContext) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![header_cell("#"), header_cell("Feature column")]);
    for (position, column) in model.schema().columns().iter().enumerate() {
        table.add_row(vec![dim_cell(position), Cell::new(column)]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    table
}

/// One-line description of a loaded model.
pub fn model_summary(model: &ModelContext) -> String {
    let accuracy = model
        .reported_accuracy()
        .map_or_else(|| UNKNOWN_ACCURACY.to_string(), percent);
    format!(
        "Model: {} ({}, {} features, accuracy {accuracy})",
        model.name().unwrap_or("unnamed"),
        model.kind(),
        model.schema().len()
    )
}

/// Feedback entries with their row index, as used by `admin edit`.
pub fn entries_table(entries: &[FeedbackEntry]) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    let mut header = vec![header_cell("#")];
    header.extend(loan_feedback::COLUMNS.iter().map(|name| header_cell(name)));
    table.set_header(header);
    for (index, entry) in entries.iter().enumerate() {
        let confidence = match entry.model_confidence {
            Some(confidence) => Cell::new(percent(confidence)),
            None => dim_cell("-"),
        };
        let prediction_color = if entry.prediction == Verdict::Approved {
            Color::Green
        } else {
            Color::Red
        };
        table.add_row(vec![
            dim_cell(index),
            Cell::new(entry.timestamp_string()),
            Cell::new(&entry.user),
            Cell::new(amount(entry.income)),
            Cell::new(amount(entry.loan_amount)),
            Cell::new(entry.prediction).fg(prediction_color),
            confidence,
            Cell::new(entry.rating),
            Cell::new(entry.opinion),
            Cell::new(&entry.suggestion),
        ]);
    }
    for index in [0, 3, 4, 6, 7] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table
}

/// Rows of the log that could not be read.
pub fn skipped_table(skipped: &[SkippedRow]) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![header_cell("Line"), header_cell("Reason")]);
    for row in skipped {
        table.add_row(vec![
            Cell::new(row.line).fg(Color::Yellow),
            Cell::new(&row.reason),
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    table
}

/// Machine-readable form of an assessment (`--format json`).
#[derive(Debug, Serialize)]
pub struct AssessmentReport<'a> {
    pub applicant: &'a str,
    pub headline: String,
    #[serde(flatten)]
    pub result: PredictionResult,
    pub reported_accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<&'a FeatureRow>,
}

impl<'a> AssessmentReport<'a> {
    pub fn new(
        assessment: &'a Assessment,
        reported_accuracy: Option<f64>,
        with_features: bool,
    ) -> Self {
        Self {
            applicant: &assessment.input.name,
            headline: assessment.result.headline(),
            result: assessment.result,
            reported_accuracy,
            features: with_features.then_some(&assessment.features),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(percent(0.824), "82.4%");
        assert_eq!(percent(1.0), "100.0%");
    }

    #[test]
    fn prediction_colors_follow_verdict() {
        let approved = PredictionResult {
            verdict: Verdict::Approved,
            confidence: 0.9,
        };
        let mut table = Table::new();
        table.force_no_tty();
        table.add_row(vec![verdict_cell(&approved)]);
        assert!(table.to_string().contains("Loan Approval: APPROVED"));
    }

    #[test]
    fn entries_table_lists_rows_with_index() {
        let entry = FeedbackEntry {
            timestamp: chrono::NaiveDateTime::parse_from_str(
                "2026-10-17 09:30:00",
                loan_model::TIMESTAMP_FORMAT,
            )
            .unwrap(),
            user: "Ayesha".to_string(),
            income: 50_000.0,
            loan_amount: 250_000.0,
            prediction: Verdict::Rejected,
            model_confidence: None,
            rating: loan_model::Rating::new(4).unwrap(),
            opinion: loan_model::AccuracyOpinion::No,
            suggestion: "faster".to_string(),
        };
        let mut table = entries_table(&[entry]);
        table.force_no_tty();
        let text = table.to_string();
        assert!(text.contains("Ayesha"));
        assert!(text.contains("faster"));
    }

    #[test]
    fn skipped_rows_show_line_numbers() {
        let skipped = [SkippedRow {
            line: 7,
            reason: "bad rating".to_string(),
        }];
        let mut table = skipped_table(&skipped);
        table.force_no_tty();
        let text = table.to_string();
        assert!(text.contains('7'));
        assert!(text.contains("bad rating"));
    }
}
