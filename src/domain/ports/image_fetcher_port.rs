//! Port definition for fetching images into cache.

use async_trait::async_trait;

use crate::domain::entities::PreloadOptions;
use crate::domain::errors::PreloadResult;

/// Port for bringing one image into the local image cache.
/// Implementations must be thread-safe.
#[async_trait]
pub trait ImageFetcherPort: Send + Sync {
    /// Fetches and decodes the image at `url`.
    ///
    /// Resolves once the image is usable, fails if it cannot be downloaded
    /// or decoded.
    async fn fetch(&self, url: &str, options: &PreloadOptions) -> PreloadResult<()>;
}
