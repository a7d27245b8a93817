//! Row layout of the feedback log.

use chrono::NaiveDateTime;
use csv::StringRecord;
use loan_model::{AccuracyOpinion, FeedbackEntry, Rating, TIMESTAMP_FORMAT, Verdict};

/// Column order of the log, fixed across appends and rewrites.
pub const COLUMNS: [&str; 9] = [
    "Timestamp",
    "User",
    "Income",
    "Loan_Amount",
    "Prediction",
    "Model_Accuracy",
    "Rating",
    "Accuracy_Opinion",
    "Suggestions",
];

/// Column order of logs written before model confidence was recorded.
pub const LEGACY_COLUMNS: [&str; 8] = [
    "Timestamp",
    "User",
    "Income",
    "Loan_Amount",
    "Prediction",
    "Rating",
    "Accuracy_Opinion",
    "Suggestions",
];

/// Which column list a file was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    Current,
    Legacy,
}

impl Layout {
    /// Recognizes a header row, ignoring a BOM and surrounding whitespace.
    pub(crate) fn detect(header: &StringRecord) -> Option<Self> {
        let names: Vec<&str> = header
            .iter()
            .map(|name| name.trim_matches('\u{feff}').trim())
            .collect();
        if names == COLUMNS {
            Some(Self::Current)
        } else if names == LEGACY_COLUMNS {
            Some(Self::Legacy)
        } else {
            None
        }
    }

    fn width(self) -> usize {
        match self {
            Self::Current => COLUMNS.len(),
            Self::Legacy => LEGACY_COLUMNS.len(),
        }
    }
}

/// Header line as written to a new file.
pub(crate) fn header_line() -> String {
    let mut line = COLUMNS.join(",");
    line.push('\n');
    line
}

/// Field values for one entry, in [`COLUMNS`] order.
pub(crate) fn encode(entry: &FeedbackEntry) -> [String; 9] {
    [
        entry.timestamp_string(),
        entry.user.clone(),
        entry.income.to_string(),
        entry.loan_amount.to_string(),
        entry.prediction.as_str().to_string(),
        entry
            .model_confidence
            .map(|c| c.to_string())
            .unwrap_or_default(),
        entry.rating.to_string(),
        entry.opinion.as_str().to_string(),
        entry.suggestion.clone(),
    ]
}

fn parse_amount(column: &str, raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{column}: '{raw}' is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{column}: '{raw}' is not finite"))
    }
}

/// Decodes one data record, returning a human-readable reason on failure.
pub(crate) fn decode(record: &StringRecord, layout: Layout) -> Result<FeedbackEntry, String> {
    if record.len() != layout.width() {
        return Err(format!(
            "expected {} fields, found {}",
            layout.width(),
            record.len()
        ));
    }
    let field = |idx: usize| record.get(idx).unwrap_or_default();
    // Legacy rows have no Model_Accuracy column; later columns shift left.
    let shift = match layout {
        Layout::Current => 0,
        Layout::Legacy => 1,
    };

    let timestamp = NaiveDateTime::parse_from_str(field(0).trim(), TIMESTAMP_FORMAT)
        .map_err(|_| format!("Timestamp: '{}' is not YYYY-MM-DD HH:MM:SS", field(0)))?;
    let income = parse_amount("Income", field(2))?;
    let loan_amount = parse_amount("Loan_Amount", field(3))?;
    let prediction = Verdict::from_log_value(field(4))
        .ok_or_else(|| format!("Prediction: '{}' is neither Approved nor Rejected", field(4)))?;
    let model_confidence = match layout {
        Layout::Legacy => None,
        Layout::Current if field(5).trim().is_empty() => None,
        Layout::Current => {
            let value = parse_amount("Model_Accuracy", field(5))?;
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("Model_Accuracy: {value} is outside [0, 1]"));
            }
            Some(value)
        }
    };
    let rating_raw = field(6 - shift).trim();
    let rating = rating_raw
        .parse::<i64>()
        .ok()
        .or_else(|| {
            // Spreadsheet exports may write integer columns as floats ("5.0").
            rating_raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0)
                .map(|v| v as i64)
        })
        .ok_or_else(|| format!("Rating: '{rating_raw}' is not a whole number"))
        .and_then(|value| Rating::new(value).map_err(|err| format!("Rating: {err}")))?;
    let opinion: AccuracyOpinion = field(7 - shift)
        .parse()
        .map_err(|err| format!("Accuracy_Opinion: {err}"))?;

    Ok(FeedbackEntry {
        timestamp,
        user: field(1).to_string(),
        income,
        loan_amount,
        prediction,
        model_confidence,
        rating,
        opinion,
        suggestion: field(8 - shift).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn detects_layouts() {
        assert_eq!(Layout::detect(&record(&COLUMNS)), Some(Layout::Current));
        assert_eq!(
            Layout::detect(&record(&LEGACY_COLUMNS)),
            Some(Layout::Legacy)
        );
        let mut bom = COLUMNS;
        bom[0] = "\u{feff}Timestamp";
        assert_eq!(Layout::detect(&record(&bom)), Some(Layout::Current));
        assert_eq!(Layout::detect(&record(&["Name", "Score"])), None);
    }

    #[test]
    fn decodes_legacy_row() {
        let entry = decode(
            &record(&[
                "2025-01-02 03:04:05",
                "Sara",
                "75000",
                "500000",
                "Loan Approval: APPROVED ✅",
                "5",
                "Yes",
                "",
            ]),
            Layout::Legacy,
        )
        .unwrap();
        assert_eq!(entry.prediction, Verdict::Approved);
        assert_eq!(entry.model_confidence, None);
        assert_eq!(entry.rating.get(), 5);
        assert_eq!(entry.opinion, AccuracyOpinion::Yes);
    }

    #[test]
    fn reports_bad_field() {
        let err = decode(
            &record(&[
                "2025-01-02 03:04:05",
                "Sara",
                "lots",
                "500000",
                "Approved",
                "0.9",
                "5",
                "Yes",
                "",
            ]),
            Layout::Current,
        )
        .unwrap_err();
        assert!(err.starts_with("Income:"), "{err}");
    }

    #[test]
    fn accepts_float_rating() {
        let entry = decode(
            &record(&[
                "2025-01-02 03:04:05",
                "Sara",
                "1",
                "2",
                "Rejected",
                "",
                "4.0",
                "No",
                "x",
            ]),
            Layout::Current,
        )
        .unwrap();
        assert_eq!(entry.rating.get(), 4);
        assert_eq!(entry.model_confidence, None);
    }
}
