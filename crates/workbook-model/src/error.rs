//! Error types for the document model

/// Document model error
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Payload is not parseable JSON
    #[error("malformed document: {0}")]
    Malformed(String),

    /// Payload parsed but carries no project metadata object
    #[error("document is missing project metadata")]
    MissingMetadata,

    /// Serialization of a document failed
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Team setup finished without any named member
    #[error("team setup needs at least one named member")]
    EmptyTeam,

    /// Role name not in the closed role set
    #[error("unknown role: '{0}'")]
    UnknownRole(String),

    /// Section name not in the access table
    #[error("unknown section: '{0}'")]
    UnknownSection(String),
}

impl ModelError {
    /// Create malformed error from any displayable cause
    #[inline]
    pub fn malformed(cause: impl std::fmt::Display) -> Self {
        Self::Malformed(cause.to_string())
    }

    /// Check if error means "this is not a workbook at all"
    #[inline]
    #[must_use]
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Malformed(_) | Self::MissingMetadata)
    }
}
