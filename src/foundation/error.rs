/// Convenient result alias used across slidewright.
pub type SlideResult<T> = Result<T, SlideError>;

/// Top-level error type for slidewright APIs.
#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    /// Input failed validation (bad indices, malformed options, invalid geometry).
    #[error("validation error: {0}")]
    Validation(String),

    /// The upstream collaborator returned nothing usable.
    #[error("upstream generation failed: {0}")]
    UpstreamGeneration(String),

    /// An embedded image, video, logo or font could not be loaded or decoded.
    #[error("asset load failed: {0}")]
    AssetLoad(String),

    /// Rasterization, snapshotting or document packaging failed during export.
    #[error("export encoding failed: {0}")]
    ExportEncoding(String),

    /// JSON serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideError {
    /// Build a [`SlideError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlideError::UpstreamGeneration`] value.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamGeneration(msg.into())
    }

    /// Build a [`SlideError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`SlideError::ExportEncoding`] value.
    pub fn export_encoding(msg: impl Into<String>) -> Self {
        Self::ExportEncoding(msg.into())
    }

    /// Build a [`SlideError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Re-tag any failure that happened while producing an export as an encoding failure,
    /// keeping asset failures as they are.
    pub(crate) fn into_export_failure(self) -> Self {
        match self {
            Self::AssetLoad(_) | Self::ExportEncoding(_) => self,
            other => Self::ExportEncoding(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SlideError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
