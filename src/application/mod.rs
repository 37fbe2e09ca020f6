//! Application layer with the preload cache and navigation use cases.

/// Application services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use services::{ImagePreloader, PerformanceMonitor, PreloaderConfig};
pub use use_cases::{
    CatalogPrefetcher, CategoryNavigator, NavigationOutcome, NavigatorConfig, ProjectNavigator,
};
