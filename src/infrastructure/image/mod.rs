//! Image fetching infrastructure.
//!
//! This module provides:
//! - HTTP and filesystem image fetching
//! - Memory caching of decoded images with LRU eviction
//! - Image optimizer URL rewriting

pub mod http_fetcher;
pub mod memory_cache;
pub mod url_optimizer;

pub use http_fetcher::{FetcherSetupError, HttpImageFetcher, HttpImageFetcherConfig, ImageLocation};
pub use memory_cache::{CacheStats, MemoryImageCache};
pub use url_optimizer::{ImageOptimizer, OptimizerError, RESPONSIVE_SIZES, optimize_image_url};
