pub mod image_preloader;
pub mod performance_monitor;

pub use image_preloader::{DEFAULT_LOW_PRIORITY_DELAY, ImagePreloader, PreloaderConfig};
pub use performance_monitor::{
    ImageFormat, ImageLoadMetrics, PerformanceMonitor, PerformanceSummary,
};
