//! Domain entity definitions.

mod preload;
mod project;
mod quality;
mod window;

pub use preload::{PreloadEntry, PreloadOptions, PreloadStats, PreloadStatus, Priority};
#[cfg(test)]
pub(crate) use project::sample_project;
pub use project::{CategoryFilter, ImageItem, Project, ProjectCategory, filter_projects};
pub use quality::{ConnectionQuality, QualityTier};
pub use window::{PreloadWindow, WindowShape};
