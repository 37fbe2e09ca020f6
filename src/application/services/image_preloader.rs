//! Deduplicating image preload cache.
//!
//! Tracks every URL requested through it, coalesces concurrent requests for
//! the same URL onto one fetch, and splits work into an awaited high-priority
//! batch and a delayed background batch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared, try_join_all};
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::application::services::PerformanceMonitor;
use crate::domain::entities::{
    PreloadEntry, PreloadOptions, PreloadStats, PreloadStatus, Priority,
};
use crate::domain::errors::{PreloadError, PreloadResult};
use crate::domain::ports::ImageFetcherPort;

/// Default delay before a low-priority batch starts.
pub const DEFAULT_LOW_PRIORITY_DELAY: Duration = Duration::from_millis(1000);

type SharedLoad = Shared<BoxFuture<'static, PreloadResult<()>>>;

/// Configuration for the preloader.
#[derive(Debug, Clone)]
pub struct PreloaderConfig {
    /// Delay before background batches are issued.
    pub low_priority_delay: Duration,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            low_priority_delay: DEFAULT_LOW_PRIORITY_DELAY,
        }
    }
}

#[derive(Default)]
struct PreloadState {
    entries: HashMap<String, PreloadEntry>,
    in_flight: HashMap<String, SharedLoad>,
    /// Bumped by `clear`; fetches from an older generation do not write back.
    generation: u64,
}

impl PreloadState {
    fn settle(&mut self, url: &str, generation: u64, result: &PreloadResult<()>) {
        if self.generation != generation {
            trace!(url, "Dropping result of fetch started before clear");
            return;
        }
        self.in_flight.remove(url);
        if let Some(entry) = self.entries.get_mut(url) {
            entry.status = match result {
                Ok(()) => PreloadStatus::Loaded,
                Err(e) => PreloadStatus::Failed(e.reason().to_string()),
            };
        }
    }
}

/// Image preload cache.
///
/// Cloning yields another handle onto the same cache.
#[derive(Clone)]
pub struct ImagePreloader {
    fetcher: Arc<dyn ImageFetcherPort>,
    state: Arc<Mutex<PreloadState>>,
    monitor: Option<Arc<PerformanceMonitor>>,
    config: PreloaderConfig,
}

impl std::fmt::Debug for ImagePreloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePreloader")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl ImagePreloader {
    /// Creates a preloader fetching through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn ImageFetcherPort>, config: PreloaderConfig) -> Self {
        Self {
            fetcher,
            state: Arc::new(Mutex::new(PreloadState::default())),
            monitor: None,
            config,
        }
    }

    /// Creates a preloader with default configuration.
    #[must_use]
    pub fn with_defaults(fetcher: Arc<dyn ImageFetcherPort>) -> Self {
        Self::new(fetcher, PreloaderConfig::default())
    }

    /// Reports display loads to `monitor`.
    #[must_use]
    pub fn with_monitor(mut self, monitor: Arc<PerformanceMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Returns the attached monitor.
    #[must_use]
    pub fn monitor(&self) -> Option<&Arc<PerformanceMonitor>> {
        self.monitor.as_ref()
    }

    /// Preloads one image.
    ///
    /// Resolves immediately if the image is already loaded and joins the
    /// in-flight fetch if one exists. A started fetch runs to completion even
    /// if every caller goes away.
    ///
    /// # Errors
    /// Returns `PreloadError::ImageLoad` if the image cannot be fetched or decoded.
    pub async fn preload_one(&self, url: &str, options: &PreloadOptions) -> PreloadResult<()> {
        let load = {
            let mut state = self.state.lock();

            if state.entries.get(url).is_some_and(|e| e.status.is_loaded()) {
                trace!(url, "Image already preloaded");
                return Ok(());
            }

            if let Some(load) = state.in_flight.get(url) {
                trace!(url, "Joining in-flight preload");
                load.clone()
            } else {
                let load = self.spawn_load(url, options, state.generation);
                state
                    .entries
                    .insert(url.to_string(), PreloadEntry::pending(url, options.priority));
                state.in_flight.insert(url.to_string(), load.clone());
                load
            }
        };

        load.await
    }

    fn spawn_load(&self, url: &str, options: &PreloadOptions, generation: u64) -> SharedLoad {
        debug!(url, priority = %options.priority, "Starting image preload");

        let fetcher = Arc::clone(&self.fetcher);
        let state = Arc::clone(&self.state);
        let task_url = url.to_string();
        let options = options.clone();

        let handle = tokio::spawn(async move {
            let result = fetcher.fetch(&task_url, &options).await;
            state.lock().settle(&task_url, generation, &result);

            match &result {
                Ok(()) => debug!(url = %task_url, "Image preloaded"),
                Err(e) => warn!(url = %task_url, error = %e, "Image preload failed"),
            }

            result
        });

        let state = Arc::clone(&self.state);
        let url = url.to_string();
        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    let result = Err(PreloadError::aborted(&url, e.to_string()));
                    state.lock().settle(&url, generation, &result);
                    result
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Loads an image that is about to be shown and reports it to the monitor.
    ///
    /// The load counts as preloaded only if the image was already loaded when
    /// it was requested. A failed load is recorded as showing the fallback.
    ///
    /// # Errors
    /// Returns `PreloadError::ImageLoad` if the image cannot be fetched or decoded.
    pub async fn load_for_display(&self, url: &str, options: &PreloadOptions) -> PreloadResult<()> {
        let was_preloaded = self.is_preloaded(url);
        if let Some(monitor) = &self.monitor {
            monitor.start_load(url, options.priority);
        }

        let result = self.preload_one(url, options).await;

        if let Some(monitor) = &self.monitor {
            monitor.complete_load(url, was_preloaded, result.is_err());
        }
        result
    }

    /// Preloads every URL concurrently.
    ///
    /// # Errors
    /// Returns the first failure; other fetches keep running.
    pub async fn preload_many<S: AsRef<str>>(
        &self,
        urls: &[S],
        options: &PreloadOptions,
    ) -> PreloadResult<()> {
        try_join_all(urls.iter().map(|url| self.preload_one(url.as_ref(), options))).await?;
        Ok(())
    }

    /// Preloads `high` and schedules `low` in the background.
    ///
    /// Returns once every high-priority image is loaded. The low-priority
    /// batch starts after the configured delay; its failures are logged and
    /// never reach the caller.
    ///
    /// # Errors
    /// Returns the first high-priority failure, in which case the low batch
    /// is not scheduled.
    pub async fn preload_with_priority<S: AsRef<str>>(
        &self,
        high: &[S],
        low: &[S],
        options: &PreloadOptions,
    ) -> PreloadResult<()> {
        let high_options = options.clone().with_priority(Priority::High);
        self.preload_many(high, &high_options).await?;

        if low.is_empty() {
            return Ok(());
        }

        let low: Vec<String> = low.iter().map(|u| u.as_ref().to_string()).collect();
        let low_options = options.clone().with_priority(Priority::Low);
        let delay = self.config.low_priority_delay;
        let preloader = self.clone();

        debug!(count = low.len(), delay_ms = delay.as_millis(), "Scheduling low priority preloads");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = preloader.preload_many(&low, &low_options).await {
                warn!(error = %e, "Low priority preload failed");
            }
        });

        Ok(())
    }

    /// Returns true if `url` has been loaded.
    #[must_use]
    pub fn is_preloaded(&self, url: &str) -> bool {
        self.state
            .lock()
            .entries
            .get(url)
            .is_some_and(|e| e.status.is_loaded())
    }

    /// Returns the tracked state of `url`.
    #[must_use]
    pub fn status(&self, url: &str) -> Option<PreloadStatus> {
        self.state.lock().entries.get(url).map(|e| e.status.clone())
    }

    /// Returns the tracked entry of `url`.
    #[must_use]
    pub fn entry(&self, url: &str) -> Option<PreloadEntry> {
        self.state.lock().entries.get(url).cloned()
    }

    /// Counts tracked entries by state.
    #[must_use]
    pub fn stats(&self) -> PreloadStats {
        let state = self.state.lock();
        let mut stats = PreloadStats {
            pending: state.in_flight.len(),
            ..PreloadStats::default()
        };
        for entry in state.entries.values() {
            match entry.status {
                PreloadStatus::Loaded => stats.preloaded += 1,
                PreloadStatus::Failed(_) => stats.failed += 1,
                PreloadStatus::Pending => {}
            }
        }
        stats
    }

    /// Forgets every tracked URL.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let count = state.entries.len();
        state.entries.clear();
        state.in_flight.clear();
        state.generation += 1;
        info!(count, "Cleared image preload cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockImageFetcher;
    use tokio_test::{assert_err, assert_ok};

    fn preloader_with(fetcher: &Arc<MockImageFetcher>) -> ImagePreloader {
        ImagePreloader::with_defaults(fetcher.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_fetch() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.delay("a.png", Duration::from_millis(100));
        let preloader = preloader_with(&fetcher);
        let options = PreloadOptions::new();

        let (first, second) = tokio::join!(
            preloader.preload_one("a.png", &options),
            preloader.preload_one("a.png", &options)
        );

        assert_ok!(first);
        assert_ok!(second);
        assert_eq!(fetcher.calls_for("a.png"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_failure() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.fail("a.png");
        fetcher.delay("a.png", Duration::from_millis(100));
        let preloader = preloader_with(&fetcher);
        let options = PreloadOptions::new();

        let (first, second) = tokio::join!(
            preloader.preload_one("a.png", &options),
            preloader.preload_one("a.png", &options)
        );

        assert_eq!(first, second);
        assert_err!(first);
        assert_eq!(fetcher.calls_for("a.png"), 1);
    }

    #[tokio::test]
    async fn test_loaded_image_is_not_fetched_again() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let preloader = preloader_with(&fetcher);
        let options = PreloadOptions::new();

        assert_ok!(preloader.preload_one("a.png", &options).await);
        assert_ok!(preloader.preload_one("a.png", &options).await);

        assert_eq!(fetcher.calls_for("a.png"), 1);
    }

    #[tokio::test]
    async fn test_is_preloaded_tracks_outcome() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.fail("bad.png");
        let preloader = preloader_with(&fetcher);
        let options = PreloadOptions::new();

        assert!(!preloader.is_preloaded("good.png"));
        assert!(!preloader.is_preloaded("bad.png"));

        assert_ok!(preloader.preload_one("good.png", &options).await);
        let err = preloader.preload_one("bad.png", &options).await.unwrap_err();

        assert!(preloader.is_preloaded("good.png"));
        assert!(!preloader.is_preloaded("bad.png"));
        assert_eq!(err.url(), "bad.png");
        assert!(matches!(
            preloader.status("bad.png"),
            Some(PreloadStatus::Failed(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_image_is_retried() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.fail("a.png");
        let preloader = preloader_with(&fetcher);
        let options = PreloadOptions::new();

        assert_err!(preloader.preload_one("a.png", &options).await);
        fetcher.recover("a.png");
        assert_ok!(preloader.preload_one("a.png", &options).await);

        assert_eq!(fetcher.calls_for("a.png"), 2);
        assert!(preloader.is_preloaded("a.png"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_completes_after_caller_gives_up() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.delay("slow.webp", Duration::from_millis(500));
        let preloader = preloader_with(&fetcher);
        let options = PreloadOptions::new();

        let attempt = tokio::time::timeout(
            Duration::from_millis(10),
            preloader.preload_one("slow.webp", &options),
        )
        .await;
        assert!(attempt.is_err());
        assert_eq!(preloader.stats().pending, 1);

        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(preloader.is_preloaded("slow.webp"));
        assert_eq!(preloader.stats().pending, 0);
    }

    #[tokio::test]
    async fn test_preload_many_fails_fast() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.fail("b.png");
        let preloader = preloader_with(&fetcher);

        let err = preloader
            .preload_many(&["a.png", "b.png", "c.png"], &PreloadOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err, PreloadError::image_load("b.png", "mock failure"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_priority_returns_before_low_batch() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let preloader = preloader_with(&fetcher);

        assert_ok!(
            preloader
                .preload_with_priority(&["a.png", "b.png"], &["c.png", "d.png"], &PreloadOptions::new())
                .await
        );

        assert!(preloader.is_preloaded("a.png"));
        assert!(preloader.is_preloaded("b.png"));
        assert_eq!(fetcher.calls_for("c.png"), 0);
        assert_eq!(fetcher.calls_for("d.png"), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(preloader.is_preloaded("c.png"));
        assert!(preloader.is_preloaded("d.png"));
        assert_eq!(
            fetcher.last_options("c.png").map(|o| o.priority),
            Some(Priority::Low)
        );
        assert_eq!(
            fetcher.last_options("a.png").map(|o| o.priority),
            Some(Priority::High)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_low_priority_failures_are_swallowed() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.fail("c.png");
        let preloader = preloader_with(&fetcher);

        assert_ok!(
            preloader
                .preload_with_priority(&["a.png"], &["c.png"], &PreloadOptions::new())
                .await
        );
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(fetcher.calls_for("c.png"), 1);
        assert!(preloader.status("c.png").is_some_and(|s| s.is_failed()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_high_priority_failure_skips_low_batch() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.fail("a.png");
        let preloader = preloader_with(&fetcher);

        assert_err!(
            preloader
                .preload_with_priority(&["a.png"], &["c.png"], &PreloadOptions::new())
                .await
        );
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(fetcher.calls_for("c.png"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_discards_in_flight_results() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.delay("a.png", Duration::from_millis(100));
        let preloader = preloader_with(&fetcher);

        let background = preloader.clone();
        let task = tokio::spawn(async move {
            background
                .preload_one("a.png", &PreloadOptions::new())
                .await
        });
        tokio::task::yield_now().await;
        assert_eq!(preloader.stats().pending, 1);

        preloader.clear();
        assert_ok!(task.await.unwrap());

        assert!(!preloader.is_preloaded("a.png"));
        assert_eq!(preloader.stats(), PreloadStats::default());
    }

    #[tokio::test]
    async fn test_stats_count_states() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.fail("bad.png");
        let preloader = preloader_with(&fetcher);
        let options = PreloadOptions::new();

        let _ = preloader.preload_many(&["a.png", "b.png"], &options).await;
        let _ = preloader.preload_one("bad.png", &options).await;

        assert_eq!(
            preloader.stats(),
            PreloadStats {
                preloaded: 2,
                pending: 0,
                failed: 1
            }
        );
    }

    #[tokio::test]
    async fn test_display_of_preloaded_image_is_reported_as_preloaded() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let monitor = Arc::new(PerformanceMonitor::new());
        let preloader = preloader_with(&fetcher).with_monitor(monitor.clone());
        let options = PreloadOptions::new();

        assert_ok!(preloader.preload_one("/images/a.webp", &options).await);
        assert_eq!(monitor.summary().total_images, 0);

        assert_ok!(preloader.load_for_display("/images/a.webp", &options).await);

        let summary = monitor.summary();
        assert_eq!(summary.total_images, 1);
        assert_eq!(summary.preloaded_images, 1);
        assert_eq!(fetcher.calls_for("/images/a.webp"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_without_preload_is_reported() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.delay("a.png", Duration::from_millis(1500));
        fetcher.fail("b.png");
        let monitor = Arc::new(PerformanceMonitor::new());
        let preloader = preloader_with(&fetcher).with_monitor(monitor.clone());
        let high = PreloadOptions::new().with_priority(Priority::High);

        assert_ok!(preloader.load_for_display("a.png", &high).await);
        assert_err!(preloader.load_for_display("b.png", &high).await);

        let slow = monitor.metrics_for("a.png").unwrap();
        assert!(!slow.was_preloaded);
        assert!(
            slow.load_duration
                .is_some_and(|d| d >= Duration::from_millis(1500))
        );
        assert!(
            PerformanceMonitor::suggestions(&slow)
                .contains(&"consider preloading this high-priority image")
        );

        let failed = monitor.metrics_for("b.png").unwrap();
        assert!(failed.load_duration.is_some());
        assert!(failed.fallback_used);

        let summary = monitor.summary();
        assert_eq!(summary.total_images, 2);
        assert_eq!(summary.preloaded_images, 0);
        assert_eq!(summary.fallback_images, 1);
    }
}
