use thiserror::Error;

/// Problems with a feature schema definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema column {position} has an empty name")]
    EmptyColumnName { position: usize },

    #[error("schema lists column '{name}' more than once")]
    DuplicateColumn { name: String },

    #[error("schema has no feature columns")]
    NoFeatureColumns,
}

pub type Result<T> = std::result::Result<T, SchemaError>;
