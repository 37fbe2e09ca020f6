//! Image preload error types.

use thiserror::Error;

/// Result type for preload operations.
pub type PreloadResult<T> = std::result::Result<T, PreloadError>;

/// Preload error variants.
///
/// Cloneable because every caller coalesced onto one fetch receives the
/// same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum PreloadError {
    #[error("failed to preload image {url}: {reason}")]
    ImageLoad { url: String, reason: String },

    #[error("preload of {url} was aborted: {reason}")]
    Aborted { url: String, reason: String },
}

impl PreloadError {
    /// Creates image load error.
    #[must_use]
    pub fn image_load(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImageLoad {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates aborted error.
    #[must_use]
    pub fn aborted(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Aborted {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns the URL the error refers to.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::ImageLoad { url, .. } | Self::Aborted { url, .. } => url,
        }
    }

    /// Returns the failure reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::ImageLoad { reason, .. } | Self::Aborted { reason, .. } => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_url() {
        let err = PreloadError::image_load("/images/a.webp", "HTTP 404");
        assert_eq!(
            err.to_string(),
            "failed to preload image /images/a.webp: HTTP 404"
        );
        assert_eq!(err.url(), "/images/a.webp");
        assert_eq!(err.reason(), "HTTP 404");
    }
}
