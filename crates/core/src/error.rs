use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or disallowed pagination/sort/filter input.
    #[error("{0}")]
    InvalidParameter(String),

    /// Structurally unacceptable import upload (empty, wrong extension,
    /// oversized). Checked before any parsing begins.
    #[error("{0}")]
    InvalidInput(String),

    /// Import content is not a JSON array at the top level. Fatal for the
    /// whole run.
    #[error("{0}")]
    MalformedInput(String),

    /// Unknown report file type. Raised before any output is written.
    #[error("{0}")]
    UnsupportedFormat(String),

    /// Any failure during a streaming report write. Callers must discard
    /// whatever output was produced.
    #[error("Report generation failed: {0}")]
    ReportGeneration(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for fallible core operations.
pub type CoreResult<T> = Result<T, CoreError>;
