//! The model's expected feature schema and reindexing against it.

use std::collections::BTreeSet;

use crate::columns::{DERIVED_COLUMNS, TARGET_PREFIX};
use crate::error::{Result, SchemaError};
use crate::row::FeatureRow;

/// Ordered list of the columns a trained model expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

/// Columns that did not line up during a reindex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReindexReport {
    /// Schema columns the derived row did not produce (filled with 0).
    pub zero_filled: Vec<String>,
    /// Derived columns the schema does not list (dropped).
    pub dropped: Vec<String>,
}

impl ReindexReport {
    /// True when the derived row matched the schema exactly.
    pub fn is_exact(&self) -> bool {
        self.zero_filled.is_empty() && self.dropped.is_empty()
    }
}

impl FeatureSchema {
    /// Builds a schema from a column list such as a training CSV header.
    ///
    /// Target columns (`Loan_Status*`) are stripped. Names are trimmed;
    /// empty or duplicate names are rejected, as is a list that is empty
    /// once the target is removed.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut kept = Vec::new();
        for (position, column) in columns.into_iter().enumerate() {
            let name = column.as_ref().trim();
            if name.is_empty() {
                return Err(SchemaError::EmptyColumnName { position });
            }
            if name.starts_with(TARGET_PREFIX) {
                continue;
            }
            if !seen.insert(name.to_string()) {
                return Err(SchemaError::DuplicateColumn {
                    name: name.to_string(),
                });
            }
            kept.push(name.to_string());
        }
        if kept.is_empty() {
            return Err(SchemaError::NoFeatureColumns);
        }
        Ok(Self { columns: kept })
    }

    /// Schema listing every derived column in production order.
    pub fn derived() -> Self {
        Self {
            columns: DERIVED_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Projects `derived` onto this schema.
    ///
    /// The result has exactly the schema's columns in the schema's order.
    /// Missing columns become 0; columns outside the schema are dropped.
    pub fn reindex(&self, derived: &FeatureRow) -> (FeatureRow, ReindexReport) {
        let mut row = FeatureRow::with_capacity(self.columns.len());
        let mut report = ReindexReport::default();

        for column in &self.columns {
            match derived.get(column) {
                Some(value) => row.push(column.clone(), value),
                None => {
                    row.push(column.clone(), 0.0);
                    report.zero_filled.push(column.clone());
                }
            }
        }
        report.dropped = derived
            .names()
            .iter()
            .filter(|name| !self.contains(name))
            .cloned()
            .collect();

        (row, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_target_columns() {
        let schema =
            FeatureSchema::from_columns(["ApplicantIncome", "Loan_Status_Y", "LoanAmount"])
                .unwrap();
        assert_eq!(schema.columns(), ["ApplicantIncome", "LoanAmount"]);
    }

    #[test]
    fn rejects_duplicates() {
        let err = FeatureSchema::from_columns(["A", "B", "A"]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateColumn {
                name: "A".to_string()
            }
        );
    }

    #[test]
    fn rejects_empty_names() {
        let err = FeatureSchema::from_columns(["A", " "]).unwrap_err();
        assert_eq!(err, SchemaError::EmptyColumnName { position: 1 });
    }

    #[test]
    fn rejects_target_only_header() {
        let err = FeatureSchema::from_columns(["Loan_Status"]).unwrap_err();
        assert_eq!(err, SchemaError::NoFeatureColumns);
    }

    #[test]
    fn reindex_fills_and_drops() {
        let schema = FeatureSchema::from_columns(["b", "missing", "a"]).unwrap();
        let mut derived = FeatureRow::new();
        derived.push("a", 1.0);
        derived.push("b", 2.0);
        derived.push("extra", 9.0);

        let (row, report) = schema.reindex(&derived);
        assert_eq!(row.names(), ["b", "missing", "a"]);
        assert_eq!(row.values(), [2.0, 0.0, 1.0]);
        assert_eq!(report.zero_filled, ["missing"]);
        assert_eq!(report.dropped, ["extra"]);
        assert!(!report.is_exact());
    }
}
