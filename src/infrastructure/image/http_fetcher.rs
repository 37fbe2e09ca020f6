//! Image fetcher backed by HTTP and the local filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, trace};

use crate::domain::entities::{ConnectionQuality, PreloadOptions};
use crate::domain::errors::{PreloadError, PreloadResult};
use crate::domain::ports::ImageFetcherPort;
use crate::infrastructure::config::ImageConfig;

use super::memory_cache::MemoryImageCache;
use super::url_optimizer::{ImageOptimizer, OptimizerError};

/// Fetcher construction failures.
#[derive(Debug, Error)]
pub enum FetcherSetupError {
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
    #[error("failed to create http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration for [`HttpImageFetcher`].
#[derive(Debug, Clone)]
pub struct HttpImageFetcherConfig {
    /// Base for site-relative paths.
    pub base_url: Option<Url>,
    /// Local directory for site-relative paths. Checked before `base_url`.
    pub assets_dir: Option<PathBuf>,
    /// Optional optimizer every remote request goes through.
    pub optimizer: Option<ImageOptimizer>,
    /// Connection class used when a request carries no explicit quality.
    pub connection: ConnectionQuality,
    /// Request timeout.
    pub timeout: Duration,
    /// Default requested width, also the downscale bound for decoded images.
    pub width: u32,
    /// Number of decoded images kept in memory.
    pub memory_cache_size: usize,
}

impl Default for HttpImageFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            assets_dir: None,
            optimizer: None,
            connection: ConnectionQuality::default(),
            timeout: Duration::from_secs(30),
            width: 640,
            memory_cache_size: super::memory_cache::DEFAULT_CACHE_SIZE,
        }
    }
}

impl TryFrom<&ImageConfig> for HttpImageFetcherConfig {
    type Error = FetcherSetupError;

    fn try_from(config: &ImageConfig) -> Result<Self, Self::Error> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|url| {
                Url::parse(url).map_err(|e| FetcherSetupError::InvalidBaseUrl {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        let optimizer = config
            .optimizer_endpoint
            .as_deref()
            .map(ImageOptimizer::new)
            .transpose()?;

        Ok(Self {
            base_url,
            assets_dir: config.assets_dir.clone(),
            optimizer,
            connection: config.connection,
            timeout: Duration::from_secs(config.timeout_secs),
            width: config.width,
            memory_cache_size: config.memory_cache_size,
        })
    }
}

/// Where a requested image is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    Remote(Url),
    Local(PathBuf),
}

/// Downloads or reads images, decodes them and keeps them in memory.
pub struct HttpImageFetcher {
    client: reqwest::Client,
    memory_cache: Arc<MemoryImageCache>,
    config: HttpImageFetcherConfig,
}

impl std::fmt::Debug for HttpImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpImageFetcher {
    /// Creates a fetcher.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: HttpImageFetcherConfig) -> Result<Self, FetcherSetupError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            memory_cache: Arc::new(MemoryImageCache::new(config.memory_cache_size)),
            config,
        })
    }

    /// Creates a fetcher from the image section of the app config.
    ///
    /// # Errors
    /// Returns error if a configured URL is invalid or the client cannot be created.
    pub fn from_config(config: &ImageConfig) -> Result<Self, FetcherSetupError> {
        Self::new(HttpImageFetcherConfig::try_from(config)?)
    }

    /// Returns the decoded image cache.
    #[must_use]
    pub fn memory_cache(&self) -> &Arc<MemoryImageCache> {
        &self.memory_cache
    }

    /// Resolves `url` to the place its bytes are read from.
    ///
    /// # Errors
    /// Returns a reason if the URL cannot be resolved with this configuration.
    pub fn locate(&self, url: &str, options: &PreloadOptions) -> Result<ImageLocation, String> {
        let width = options.width.unwrap_or(self.config.width);
        let quality = options
            .quality
            .unwrap_or_else(|| self.config.connection.image_quality(options.priority.into()));

        if let Ok(absolute) = Url::parse(url) {
            return match absolute.scheme() {
                "http" | "https" => Ok(ImageLocation::Remote(
                    self.config
                        .optimizer
                        .as_ref()
                        .map_or(absolute, |o| o.optimize(url, width, quality)),
                )),
                "file" => absolute
                    .to_file_path()
                    .map(ImageLocation::Local)
                    .map_err(|()| format!("invalid file url {url}")),
                scheme => Err(format!("unsupported url scheme {scheme}")),
            };
        }

        if let Some(dir) = &self.config.assets_dir {
            return Ok(ImageLocation::Local(dir.join(url.trim_start_matches('/'))));
        }
        if let Some(optimizer) = &self.config.optimizer {
            return Ok(ImageLocation::Remote(optimizer.optimize(url, width, quality)));
        }
        if let Some(base) = &self.config.base_url {
            return base
                .join(url)
                .map(ImageLocation::Remote)
                .map_err(|e| format!("cannot resolve {url}: {e}"));
        }

        Err(format!("relative url {url} needs a base url or assets dir"))
    }

    async fn download(&self, url: &Url) -> Result<Vec<u8>, String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| format!("Request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!(
                "HTTP {}: {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("Unknown")
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read body: {e}"))?;
        Ok(bytes.to_vec())
    }

    async fn read_local(path: &Path) -> Result<Vec<u8>, String> {
        tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))
    }
}

fn decode(bytes: &[u8], max_width: u32) -> Result<image::DynamicImage, String> {
    let img = image::load_from_memory(bytes).map_err(|e| format!("Decode failed: {e}"))?;
    if max_width > 0 && img.width() > max_width {
        Ok(img.resize(
            max_width,
            img.height(),
            image::imageops::FilterType::Lanczos3,
        ))
    } else {
        Ok(img)
    }
}

#[async_trait]
impl ImageFetcherPort for HttpImageFetcher {
    async fn fetch(&self, url: &str, options: &PreloadOptions) -> PreloadResult<()> {
        if self.memory_cache.contains(url).await {
            trace!(url, "Image already decoded");
            return Ok(());
        }

        let location = self
            .locate(url, options)
            .map_err(|reason| PreloadError::image_load(url, reason))?;
        debug!(url, location = ?location, priority = ?options.priority, "Fetching image");

        let bytes = match &location {
            ImageLocation::Remote(remote) => self.download(remote).await,
            ImageLocation::Local(path) => Self::read_local(path).await,
        }
        .map_err(|reason| PreloadError::image_load(url, reason))?;

        let max_width = self.config.width;
        let decoded = tokio::task::spawn_blocking(move || decode(&bytes, max_width))
            .await
            .map_err(|e| PreloadError::aborted(url, format!("Decode task failed: {e}")))?
            .map_err(|reason| PreloadError::image_load(url, reason))?;

        debug!(
            url,
            width = decoded.width(),
            height = decoded.height(),
            "Image decoded"
        );
        self.memory_cache.put(url, Arc::new(decoded)).await;
        Ok(())
    }
}
