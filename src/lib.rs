//! Folio - image prefetching and carousel navigation for a project showcase.
//!
//! This crate provides a coalescing image preload cache, a carousel cursor
//! that warms the cache around the visible projects, and a terminal viewer
//! that browses a project catalog with them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the preload cache and navigation use cases.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing image fetching, catalog and config adapters.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "folio";
