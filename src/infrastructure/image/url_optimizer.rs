//! Image optimizer URL rewriting.

use reqwest::Url;
use thiserror::Error;

/// Responsive `sizes` hint for project card images.
pub const RESPONSIVE_SIZES: &str = "(max-width: 475px) 95vw, (max-width: 640px) 90vw, (max-width: 768px) 50vw, (max-width: 1024px) 33vw, 400px";

/// Invalid optimizer configuration.
#[derive(Debug, Error)]
#[error("invalid image optimizer endpoint {endpoint}: {reason}")]
pub struct OptimizerError {
    endpoint: String,
    reason: String,
}

/// Rewrites image sources to an on-the-fly optimizer.
///
/// Produces `<endpoint>?url=<src>&w=<width>&q=<quality>`, the query shape
/// used by the Next.js image endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptimizer {
    endpoint: Url,
}

impl ImageOptimizer {
    /// Creates an optimizer for `endpoint`.
    ///
    /// # Errors
    /// Returns error if the endpoint is not an absolute URL.
    pub fn new(endpoint: &str) -> Result<Self, OptimizerError> {
        let endpoint = Url::parse(endpoint).map_err(|e| OptimizerError {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { endpoint })
    }

    /// Returns the optimized URL for `src`.
    #[must_use]
    pub fn optimize(&self, src: &str, width: u32, quality: u8) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("url", src)
            .append_pair("w", &width.to_string())
            .append_pair("q", &quality.to_string());
        url
    }
}

/// Returns the optimized URL, or `src` unchanged without an optimizer.
#[must_use]
pub fn optimize_image_url(
    optimizer: Option<&ImageOptimizer>,
    src: &str,
    width: u32,
    quality: u8,
) -> String {
    optimizer.map_or_else(
        || src.to_string(),
        |o| o.optimize(src, width, quality).to_string(),
    )
}
