use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// The source is missing or cannot be turned into valid listings.
    #[error("Dataset '{path}' is unavailable: {reason}")]
    DataUnavailable { path: String, reason: String },

    /// The requested listing is not part of the given set.
    #[error("Listing '{id}' was not found in the current selection.")]
    NotFound { id: String },
}

impl DatasetError {
    pub(crate) fn unavailable(path: &Path, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}
