//! Errors raised while importing a foreign snapshot

use workbook_model::ModelError;

/// Import rejection
///
/// Every variant means the local document was left untouched.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Bytes are not valid UTF-8
    #[error("import is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Text is not valid JSON
    #[error("import is not valid JSON: {0}")]
    Malformed(String),

    /// JSON does not look like a workbook (no `meta` object)
    #[error("import is not a workbook: missing project metadata")]
    MissingMetadata,
}

impl MergeError {
    /// Short message suitable for showing to the person importing
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Encoding(_) | Self::Malformed(_) => "The file could not be read",
            Self::MissingMetadata => "The file is not a valid project workbook",
        }
    }
}

impl From<serde_json::Error> for MergeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<ModelError> for MergeError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MissingMetadata => Self::MissingMetadata,
            other => Self::Malformed(other.to_string()),
        }
    }
}
