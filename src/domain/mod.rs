//! Domain layer with core entities, errors, and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Pure domain services.
pub mod services;

pub use entities::{
    ImageItem, PreloadEntry, PreloadOptions, PreloadStatus, PreloadWindow, Priority, Project,
};
pub use errors::{PreloadError, PreloadResult};
pub use ports::ImageFetcherPort;
