//! Warms the image cache for a whole project catalog.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::application::services::ImagePreloader;
use crate::domain::entities::{CategoryFilter, ImageItem, PreloadOptions, Project};
use crate::domain::errors::PreloadResult;

/// Configuration for catalog-wide prefetching.
#[derive(Debug, Clone)]
pub struct CatalogPrefetchConfig {
    /// Delay before the catalog prefetch starts, leaving room for critical work.
    pub initial_delay: Duration,
    /// Number of leading projects loaded with high priority.
    pub high_priority_count: usize,
    /// Hints passed to every request.
    pub options: PreloadOptions,
}

impl Default for CatalogPrefetchConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            high_priority_count: 3,
            options: PreloadOptions::default(),
        }
    }
}

/// Prefetches catalog images ahead of navigation.
#[derive(Debug, Clone)]
pub struct CatalogPrefetcher {
    preloader: ImagePreloader,
    config: CatalogPrefetchConfig,
}

impl CatalogPrefetcher {
    /// Creates prefetcher.
    #[must_use]
    pub const fn new(preloader: ImagePreloader, config: CatalogPrefetchConfig) -> Self {
        Self { preloader, config }
    }

    /// Loads the leading projects with high priority and the rest in the background.
    ///
    /// # Errors
    /// Returns the first high-priority failure.
    pub async fn prefetch_catalog(&self, projects: &[Project]) -> PreloadResult<()> {
        let images: Vec<&str> = projects.iter().map(ImageItem::image_url).collect();
        let split = self.config.high_priority_count.min(images.len());
        let (high, low) = images.split_at(split);

        self.preloader
            .preload_with_priority(high, low, &self.config.options)
            .await?;

        info!(
            high = high.len(),
            low = low.len(),
            "Preloaded high priority images, low priority images loading in background"
        );
        Ok(())
    }

    /// Starts [`Self::prefetch_catalog`] after the initial delay. Errors are logged.
    pub fn spawn_catalog_prefetch(&self, projects: Arc<[Project]>) -> JoinHandle<()> {
        let prefetcher = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(prefetcher.config.initial_delay).await;
            if let Err(e) = prefetcher.prefetch_catalog(&projects).await {
                warn!(error = %e, "Error preloading catalog images");
            }
        })
    }

    /// Loads every image of the projects matching `filter`.
    ///
    /// # Errors
    /// Returns the first failure.
    pub async fn prefetch_category(
        &self,
        projects: &[Project],
        filter: CategoryFilter,
    ) -> PreloadResult<()> {
        let images: Vec<&str> = projects
            .iter()
            .filter(|p| filter.matches(p))
            .map(ImageItem::image_url)
            .collect();

        self.preloader
            .preload_many(&images, &self.config.options)
            .await
    }

    /// Starts [`Self::prefetch_category`] in the background. Errors are logged.
    pub fn spawn_category_prefetch(
        &self,
        projects: Arc<[Project]>,
        filter: CategoryFilter,
    ) -> JoinHandle<()> {
        let prefetcher = self.clone();
        tokio::spawn(async move {
            if let Err(e) = prefetcher.prefetch_category(&projects, filter).await {
                warn!(error = %e, %filter, "Error preloading category images");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ProjectCategory, sample_project};
    use crate::domain::ports::mocks::MockImageFetcher;
    use tokio_test::assert_ok;

    fn catalog() -> Vec<Project> {
        vec![
            sample_project("a", ProjectCategory::Web),
            sample_project("b", ProjectCategory::Ai),
            sample_project("c", ProjectCategory::Web),
            sample_project("d", ProjectCategory::Ai),
            sample_project("e", ProjectCategory::Other),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_catalog_prefetch_splits_by_position() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let preloader = ImagePreloader::with_defaults(fetcher.clone());
        let prefetcher = CatalogPrefetcher::new(preloader.clone(), CatalogPrefetchConfig::default());

        assert_ok!(prefetcher.prefetch_catalog(&catalog()).await);

        assert!(preloader.is_preloaded("/images/a.webp"));
        assert!(preloader.is_preloaded("/images/c.webp"));
        assert_eq!(fetcher.calls_for("/images/d.webp"), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(preloader.is_preloaded("/images/e.webp"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_prefetch_waits_initial_delay() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let preloader = ImagePreloader::with_defaults(fetcher.clone());
        let prefetcher = CatalogPrefetcher::new(preloader, CatalogPrefetchConfig::default());

        let handle = prefetcher.spawn_catalog_prefetch(Arc::from(catalog()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(fetcher.requested().is_empty());

        handle.await.unwrap();
        assert_eq!(fetcher.requested().len(), 3);
    }

    #[tokio::test]
    async fn test_category_prefetch_filters() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let preloader = ImagePreloader::with_defaults(fetcher.clone());
        let prefetcher = CatalogPrefetcher::new(preloader, CatalogPrefetchConfig::default());

        assert_ok!(
            prefetcher
                .prefetch_category(&catalog(), CategoryFilter::Only(ProjectCategory::Ai))
                .await
        );

        let mut requested = fetcher.requested();
        requested.sort();
        assert_eq!(requested, vec!["/images/b.webp", "/images/d.webp"]);
    }
}
