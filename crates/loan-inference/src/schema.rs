//! Feature schema from a training CSV header.

use std::path::Path;

use csv::ReaderBuilder;
use loan_transform::FeatureSchema;
use tracing::debug;

use crate::error::{ModelError, Result};

/// Reads the header row of `path` and builds the feature schema from it.
///
/// Only the header is consumed; data rows are never parsed. A UTF-8 BOM on
/// the first column name is ignored.
pub fn load_schema(path: &Path) -> Result<FeatureSchema> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| ModelError::SchemaRead {
            path: path.to_path_buf(),
            source,
        })?;
    let headers = reader.headers().map_err(|source| ModelError::SchemaRead {
        path: path.to_path_buf(),
        source,
    })?;

    let columns: Vec<&str> = headers
        .iter()
        .map(|name| name.trim_matches('\u{feff}'))
        .collect();
    let schema = FeatureSchema::from_columns(columns).map_err(|source| {
        ModelError::InvalidSchema {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), columns = schema.len(), "Loaded feature schema");
    Ok(schema)
}
