//! Use case implementations.

mod catalog_prefetcher;
mod category_navigator;
mod project_navigator;

pub use catalog_prefetcher::{CatalogPrefetchConfig, CatalogPrefetcher};
pub use category_navigator::{CategoryNavigator, DEFAULT_CATEGORY_TRANSITION_DELAY};
pub use project_navigator::{
    DEFAULT_LOOKAHEAD, DEFAULT_TRANSITION_DELAY, NavigationOutcome, NavigatorConfig,
    ProjectNavigator, Transition,
};
