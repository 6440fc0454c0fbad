use dataset::DatasetError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// A numeric input was rejected; the caller should prompt for it again.
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl AnalyticsError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput(field.to_string(), reason.into())
    }

    /// The figure derived from the inputs does not fit in a `Decimal`.
    pub(crate) fn overflow(field: &str) -> Self {
        Self::invalid(field, "the result is too large to represent")
    }
}
