//! Image load timing metrics.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::domain::entities::Priority;

/// Loads slower than this are reported as slow.
pub const SLOW_LOAD_THRESHOLD: Duration = Duration::from_millis(1000);

/// Loads slower than this are reported as very slow.
pub const VERY_SLOW_LOAD_THRESHOLD: Duration = Duration::from_millis(2000);

/// Default period of the summary logging task.
pub const DEFAULT_SUMMARY_INTERVAL: Duration = Duration::from_secs(30);

/// Image encoding guessed from the source URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImageFormat {
    /// WebP.
    Webp,
    /// AVIF.
    Avif,
    /// JPEG.
    Jpeg,
    /// PNG.
    Png,
    /// Not recognised.
    Unknown,
}

impl ImageFormat {
    /// Guesses the format from the URL.
    #[must_use]
    pub fn from_src(src: &str) -> Self {
        let src = src.to_ascii_lowercase();
        if src.contains(".webp") {
            Self::Webp
        } else if src.contains(".avif") {
            Self::Avif
        } else if src.contains(".jpg") || src.contains(".jpeg") {
            Self::Jpeg
        } else if src.contains(".png") {
            Self::Png
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Webp => write!(f, "webp"),
            Self::Avif => write!(f, "avif"),
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Timing record for one image.
#[derive(Debug, Clone)]
pub struct ImageLoadMetrics {
    /// Source URL.
    pub src: String,
    /// When loading started.
    pub started_at: Instant,
    /// How long the load took, once complete.
    pub load_duration: Option<Duration>,
    /// Whether the image was already preloaded when it was shown.
    pub was_preloaded: bool,
    /// Tier of the request.
    pub priority: Priority,
    /// Detected encoding.
    pub format: ImageFormat,
    /// Whether a fallback source was shown instead.
    pub fallback_used: bool,
}

impl ImageLoadMetrics {
    fn file_name(&self) -> &str {
        self.src.rsplit('/').next().unwrap_or(&self.src)
    }
}

/// Aggregate over completed loads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceSummary {
    /// Number of completed loads.
    pub total_images: usize,
    /// Mean load duration.
    pub average_load_time: Duration,
    /// Loads slower than the slow threshold.
    pub slow_images: usize,
    /// Loads that were already preloaded when shown.
    pub preloaded_images: usize,
    /// Loads that showed the fallback.
    pub fallback_images: usize,
    /// Completed loads per format.
    pub format_breakdown: BTreeMap<ImageFormat, usize>,
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images, avg {}ms, {} slow, {} preloaded",
            self.total_images,
            self.average_load_time.as_millis(),
            self.slow_images,
            self.preloaded_images
        )
    }
}

/// Records image load timings and reports slow loads.
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    metrics: Mutex<HashMap<String, ImageLoadMetrics>>,
}

impl PerformanceMonitor {
    /// Creates an empty monitor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a load, replacing any earlier record for `src`.
    pub fn start_load(&self, src: &str, priority: Priority) {
        let format = ImageFormat::from_src(src);
        debug!(src, %format, %priority, "Loading image");

        self.metrics.lock().insert(
            src.to_string(),
            ImageLoadMetrics {
                src: src.to_string(),
                started_at: Instant::now(),
                load_duration: None,
                was_preloaded: false,
                priority,
                format,
                fallback_used: false,
            },
        );
    }

    /// Completes tracking of a load and returns its duration.
    ///
    /// Returns `None` if the load was never started.
    pub fn complete_load(&self, src: &str, was_preloaded: bool, fallback_used: bool) -> Option<Duration> {
        let metric = {
            let mut metrics = self.metrics.lock();
            let metric = metrics.get_mut(src)?;
            let duration = metric.started_at.elapsed();
            metric.load_duration = Some(duration);
            metric.was_preloaded = was_preloaded;
            metric.fallback_used = fallback_used;
            metric.clone()
        };

        Self::log_load(&metric);

        metric.load_duration
    }

    /// Returns the record for `src`, if any.
    #[must_use]
    pub fn metrics_for(&self, src: &str) -> Option<ImageLoadMetrics> {
        self.metrics.lock().get(src).cloned()
    }

    /// Optimisation hints for a slow load.
    #[must_use]
    pub fn suggestions(metric: &ImageLoadMetrics) -> Vec<&'static str> {
        let Some(duration) = metric.load_duration else {
            return Vec::new();
        };
        if duration <= SLOW_LOAD_THRESHOLD {
            return Vec::new();
        }

        let mut suggestions = Vec::new();
        if metric.format == ImageFormat::Png {
            suggestions.push("consider using WebP or AVIF");
        }
        if duration > VERY_SLOW_LOAD_THRESHOLD {
            suggestions.push("image may be too large, consider further compression");
        }
        if !metric.was_preloaded && metric.priority.is_high() {
            suggestions.push("consider preloading this high-priority image");
        }
        suggestions
    }

    fn log_load(metric: &ImageLoadMetrics) {
        let Some(duration) = metric.load_duration else {
            return;
        };
        let ms = duration.as_millis();
        let file = metric.file_name();

        if duration < SLOW_LOAD_THRESHOLD {
            debug!(
                file,
                ms,
                format = %metric.format,
                preloaded = metric.was_preloaded,
                fallback = metric.fallback_used,
                "Image loaded"
            );
        } else if duration < VERY_SLOW_LOAD_THRESHOLD {
            warn!(
                file,
                ms,
                format = %metric.format,
                preloaded = metric.was_preloaded,
                fallback = metric.fallback_used,
                "Image loaded slowly"
            );
        } else {
            error!(
                file,
                ms,
                format = %metric.format,
                preloaded = metric.was_preloaded,
                fallback = metric.fallback_used,
                "Image loaded very slowly"
            );
        }

        for suggestion in Self::suggestions(metric) {
            info!(file, suggestion, "Image optimisation suggestion");
        }
    }

    /// Summarises completed loads.
    #[must_use]
    pub fn summary(&self) -> PerformanceSummary {
        let metrics = self.metrics.lock();
        let completed: Vec<_> = metrics
            .values()
            .filter_map(|m| m.load_duration.map(|d| (m, d)))
            .collect();

        if completed.is_empty() {
            return PerformanceSummary::default();
        }

        let total: Duration = completed.iter().map(|(_, d)| *d).sum();
        let count = u32::try_from(completed.len()).unwrap_or(u32::MAX);

        let mut format_breakdown = BTreeMap::new();
        for (m, _) in &completed {
            *format_breakdown.entry(m.format).or_insert(0) += 1;
        }

        PerformanceSummary {
            total_images: completed.len(),
            average_load_time: total / count,
            slow_images: completed
                .iter()
                .filter(|(_, d)| *d > SLOW_LOAD_THRESHOLD)
                .count(),
            preloaded_images: completed.iter().filter(|(m, _)| m.was_preloaded).count(),
            fallback_images: completed.iter().filter(|(m, _)| m.fallback_used).count(),
            format_breakdown,
        }
    }

    /// Logs the summary.
    pub fn log_summary(&self) {
        let summary = self.summary();
        info!(
            total = summary.total_images,
            average_ms = summary.average_load_time.as_millis(),
            slow = summary.slow_images,
            preloaded = summary.preloaded_images,
            fallback = summary.fallback_images,
            formats = ?summary.format_breakdown,
            "Image loading performance summary"
        );
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.metrics.lock().clear();
    }

    /// Spawns a task logging the summary every `period` while loads exist.
    pub fn spawn_periodic_summary(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if monitor.summary().total_images > 0 {
                    monitor.log_summary();
                }
            }
        })
    }
}
