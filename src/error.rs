use thiserror::Error;

/// Fatal render failures. Style-level anomalies (unparseable sizes or
/// colors) are not errors; they fall back to defaults and are logged.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid page geometry or layout configuration. Raised before any
    /// rendering happens; no partial artifact is produced.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The document tree is malformed (wrong root type, a content field
    /// that is not a list, ...). Raised before any rendering happens.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
