//! Staged row-level edits to the feedback log.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use loan_model::{AccuracyOpinion, FeedbackEntry, Rating, TIMESTAMP_FORMAT, Verdict};

use crate::error::{AdminError, Result};

/// An editable column, named as in the log header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Timestamp,
    User,
    Income,
    LoanAmount,
    Prediction,
    ModelAccuracy,
    Rating,
    AccuracyOpinion,
    Suggestions,
}

impl EditField {
    pub const ALL: [EditField; 9] = [
        EditField::Timestamp,
        EditField::User,
        EditField::Income,
        EditField::LoanAmount,
        EditField::Prediction,
        EditField::ModelAccuracy,
        EditField::Rating,
        EditField::AccuracyOpinion,
        EditField::Suggestions,
    ];

    /// Column name in the log header.
    pub const fn as_str(&self) -> &'static str {
        match self {
            EditField::Timestamp => "Timestamp",
            EditField::User => "User",
            EditField::Income => "Income",
            EditField::LoanAmount => "Loan_Amount",
            EditField::Prediction => "Prediction",
            EditField::ModelAccuracy => "Model_Accuracy",
            EditField::Rating => "Rating",
            EditField::AccuracyOpinion => "Accuracy_Opinion",
            EditField::Suggestions => "Suggestions",
        }
    }
}

impl fmt::Display for EditField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditField {
    type Err = AdminError;

    /// Column names match case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        EditField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AdminError::UnknownField {
                field: wanted.to_string(),
            })
    }
}

fn invalid(field: EditField, reason: impl Into<String>) -> AdminError {
    AdminError::InvalidValue {
        field: field.as_str(),
        reason: reason.into(),
    }
}

fn parse_amount(field: EditField, value: &str) -> Result<f64> {
    let amount: f64 = value
        .trim()
        .parse()
        .map_err(|_| invalid(field, format!("'{value}' is not a number")))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(invalid(field, "must be a finite, non-negative number"));
    }
    Ok(amount)
}

/// Working copy of the log's entries.
///
/// Changes are validated as they are staged and only reach the file when
/// the session is saved through the console. Dropping a session discards
/// its changes.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    entries: Vec<FeedbackEntry>,
    modified: bool,
    unreadable_rows: usize,
    discard_unreadable: bool,
}

impl EditSession {
    pub(crate) fn new(entries: Vec<FeedbackEntry>, unreadable_rows: usize) -> Self {
        Self {
            entries,
            modified: false,
            unreadable_rows,
            discard_unreadable: false,
        }
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether anything has been staged.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Rows that failed to parse when the session began.
    pub fn unreadable_rows(&self) -> usize {
        self.unreadable_rows
    }

    /// Lets a save rewrite the log without its unreadable rows. Without
    /// this, saving a session that has any is refused.
    pub fn discard_unreadable(&mut self) {
        self.discard_unreadable = true;
    }

    pub fn discards_unreadable(&self) -> bool {
        self.discard_unreadable
    }

    pub(crate) fn into_entries(self) -> Vec<FeedbackEntry> {
        self.entries
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(AdminError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Removes and returns the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Result<FeedbackEntry> {
        self.check_index(index)?;
        self.modified = true;
        Ok(self.entries.remove(index))
    }

    /// Replaces the entry at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, entry: FeedbackEntry) -> Result<FeedbackEntry> {
        self.check_index(index)?;
        self.modified = true;
        Ok(std::mem::replace(&mut self.entries[index], entry))
    }

    /// Appends a new entry at the end.
    pub fn push(&mut self, entry: FeedbackEntry) {
        self.modified = true;
        self.entries.push(entry);
    }

    /// Sets one column of one row from its text form.
    ///
    /// The value is parsed with the same rules used when reading the log.
    /// Nothing changes if parsing fails.
    pub fn set_field(&mut self, index: usize, field: &str, value: &str) -> Result<()> {
        self.check_index(index)?;
        let field: EditField = field.parse()?;
        let mut updated = self.entries[index].clone();

        match field {
            EditField::Timestamp => {
                updated.timestamp = NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
                    .map_err(|_| invalid(field, "expected YYYY-MM-DD HH:MM:SS"))?;
            }
            EditField::User => {
                if value.trim().is_empty() {
                    return Err(invalid(field, "must not be empty"));
                }
                updated.user = value.to_string();
            }
            EditField::Income => updated.income = parse_amount(field, value)?,
            EditField::LoanAmount => updated.loan_amount = parse_amount(field, value)?,
            EditField::Prediction => {
                updated.prediction = value
                    .parse::<Verdict>()
                    .map_err(|err| invalid(field, err.to_string()))?;
            }
            EditField::ModelAccuracy => {
                updated.model_confidence = if value.trim().is_empty() {
                    None
                } else {
                    let confidence = parse_amount(field, value)?;
                    if confidence > 1.0 {
                        return Err(invalid(field, "must be within [0, 1]"));
                    }
                    Some(confidence)
                };
            }
            EditField::Rating => {
                let raw: i64 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(field, format!("'{value}' is not a whole number")))?;
                updated.rating = Rating::new(raw).map_err(|err| invalid(field, err.to_string()))?;
            }
            EditField::AccuracyOpinion => {
                updated.opinion = value
                    .parse::<AccuracyOpinion>()
                    .map_err(|err| invalid(field, err.to_string()))?;
            }
            EditField::Suggestions => updated.suggestion = value.to_string(),
        }

        self.entries[index] = updated;
        self.modified = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeedbackEntry {
        FeedbackEntry {
            timestamp: NaiveDateTime::parse_from_str("2026-01-01 00:00:00", TIMESTAMP_FORMAT)
                .unwrap(),
            user: "A".to_string(),
            income: 1.0,
            loan_amount: 2.0,
            prediction: Verdict::Approved,
            model_confidence: Some(0.6),
            rating: Rating::new(3).unwrap(),
            opinion: AccuracyOpinion::Maybe,
            suggestion: String::new(),
        }
    }

    #[test]
    fn field_names_match_log_columns() {
        let names: Vec<_> = EditField::ALL.iter().map(EditField::as_str).collect();
        assert_eq!(names, loan_feedback::COLUMNS);
        assert_eq!("loan_amount".parse::<EditField>().unwrap(), EditField::LoanAmount);
        assert!(matches!(
            "Score".parse::<EditField>(),
            Err(AdminError::UnknownField { .. })
        ));
    }

    #[test]
    fn set_field_parses_values() {
        let mut session = EditSession::new(vec![sample()], 0);
        session.set_field(0, "Rating", "5").unwrap();
        session.set_field(0, "Prediction", "rejected").unwrap();
        session.set_field(0, "Model_Accuracy", "").unwrap();
        session.set_field(0, "Suggestions", "a, b\nc").unwrap();

        let entry = &session.entries()[0];
        assert_eq!(entry.rating.get(), 5);
        assert_eq!(entry.prediction, Verdict::Rejected);
        assert_eq!(entry.model_confidence, None);
        assert_eq!(entry.suggestion, "a, b\nc");
        assert!(session.is_modified());
    }

    #[test]
    fn failed_set_leaves_row_unchanged() {
        let mut session = EditSession::new(vec![sample()], 0);
        let err = session.set_field(0, "Rating", "7").unwrap_err();
        assert!(matches!(err, AdminError::InvalidValue { field: "Rating", .. }));
        assert_eq!(session.entries()[0], sample());
        assert!(!session.is_modified());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut session = EditSession::new(vec![sample()], 0);
        assert!(matches!(
            session.remove(1),
            Err(AdminError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(session.replace(3, sample()).is_err());
        assert!(session.set_field(1, "User", "B").is_err());
    }

    #[test]
    fn remove_and_push() {
        let mut session = EditSession::new(vec![sample()], 2);
        let removed = session.remove(0).unwrap();
        assert!(session.is_empty());
        session.push(removed);
        assert_eq!(session.len(), 1);
        assert_eq!(session.unreadable_rows(), 2);
    }
}
