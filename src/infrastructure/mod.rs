//! Infrastructure layer with external service adapters.

/// Project catalog loading.
pub mod catalog;
/// Application configuration.
pub mod config;
/// Image fetching and caching.
pub mod image;

pub use catalog::{CatalogError, CatalogFormat, load_catalog, parse_catalog};
pub use config::{AppConfig, CliArgs, LogLevel, StateConfig, StorageManager};
pub use image::{
    CacheStats, HttpImageFetcher, HttpImageFetcherConfig, ImageOptimizer, MemoryImageCache,
};
