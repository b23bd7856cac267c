use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the presentation layer. The pipeline never recovers
/// locally and never substitutes default data.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source file could not be opened or parsed as tabular data.
    #[error("cannot read '{}' as tabular data", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Required columns are absent after header normalization.
    #[error("missing required columns after header normalization: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    /// A filter or distinct query referenced a column that does not exist.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// A range filter was asked for an empty interval.
    #[error("invalid range: low ({low}) is greater than high ({high})")]
    InvalidRange { low: f64, high: f64 },
}
