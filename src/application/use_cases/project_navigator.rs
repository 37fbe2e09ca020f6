//! Carousel cursor with transition cooldown and neighbourhood preloading.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::application::services::ImagePreloader;
use crate::domain::entities::{ImageItem, PreloadOptions, PreloadWindow, WindowShape};
use crate::domain::services::{
    compute_window, display_indices, next_index, previous_index, wrap_index,
};

/// Default cooldown between a navigation request and its commit.
pub const DEFAULT_TRANSITION_DELAY: Duration = Duration::from_millis(150);

/// Default number of low-priority items preloaded past the high range.
pub const DEFAULT_LOOKAHEAD: usize = 3;

/// Configuration for a navigator.
#[derive(Debug, Clone)]
pub struct NavigatorConfig {
    /// Items after the high-priority range to preload in the background.
    pub lookahead: usize,
    /// High/low split around the cursor.
    pub shape: WindowShape,
    /// Fixed visual timing budget of a transition.
    pub transition_delay: Duration,
    /// Hints passed to every preload request.
    pub options: PreloadOptions,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            shape: WindowShape::default(),
            transition_delay: DEFAULT_TRANSITION_DELAY,
            options: PreloadOptions::default(),
        }
    }
}

/// Pending commit of a navigation request.
#[derive(Debug)]
pub struct Transition<K = usize> {
    /// Where the cursor will land.
    pub target: K,
    handle: JoinHandle<()>,
}

impl<K> Transition<K> {
    pub(crate) const fn new(target: K, handle: JoinHandle<()>) -> Self {
        Self { target, handle }
    }

    /// Waits until the transition has been committed.
    pub async fn settled(self) {
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Transition task failed");
        }
    }
}

/// Result of a navigation request.
#[derive(Debug)]
pub enum NavigationOutcome<K = usize> {
    /// A transition was started.
    Started(Transition<K>),
    /// Another transition is in progress, or there is nothing to navigate.
    Ignored,
    /// The target is already current.
    Unchanged,
}

impl<K> NavigationOutcome<K> {
    /// Returns true if a transition was started.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }

    /// Returns the started transition, if any.
    #[must_use]
    pub fn into_transition(self) -> Option<Transition<K>> {
        match self {
            Self::Started(transition) => Some(transition),
            Self::Ignored | Self::Unchanged => None,
        }
    }
}

#[derive(Debug, Default)]
struct NavigationState {
    current: usize,
    transitioning: bool,
}

/// Cursor over a shared collection of items with images.
///
/// Navigation is Idle -> Transitioning -> Idle: a request flips the flag at
/// once, preloads around the target, and commits the target after the
/// transition delay whether or not preloading has finished. Requests made
/// while transitioning are ignored.
pub struct ProjectNavigator<T> {
    items: Arc<[T]>,
    preloader: ImagePreloader,
    state: Arc<Mutex<NavigationState>>,
    config: NavigatorConfig,
}

impl<T> std::fmt::Debug for ProjectNavigator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectNavigator")
            .field("len", &self.items.len())
            .field("state", &*self.state.lock())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: ImageItem> ProjectNavigator<T> {
    /// Creates a navigator positioned at the first item.
    #[must_use]
    pub fn new(items: Arc<[T]>, preloader: ImagePreloader, config: NavigatorConfig) -> Self {
        Self {
            items,
            preloader,
            state: Arc::new(Mutex::new(NavigationState::default())),
            config,
        }
    }

    /// Returns the shared collection.
    #[must_use]
    pub fn items(&self) -> &Arc<[T]> {
        &self.items
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there is nothing to navigate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the committed cursor position.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.lock().current
    }

    /// Returns the item under the cursor.
    #[must_use]
    pub fn current_item(&self) -> Option<&T> {
        self.items.get(self.current_index())
    }

    /// Returns true while a transition is pending.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.state.lock().transitioning
    }

    /// Moves to the next item, wrapping to the first.
    pub fn next(&self) -> NavigationOutcome {
        self.navigate(next_index)
    }

    /// Moves to the previous item, wrapping to the last.
    pub fn previous(&self) -> NavigationOutcome {
        self.navigate(previous_index)
    }

    /// Moves to `index`. Indices past the end wrap around.
    pub fn go_to(&self, index: usize) -> NavigationOutcome {
        let len = self.items.len();
        if index >= len && len > 0 {
            debug!(index, len, "Wrapping out of range navigation target");
        }
        self.navigate(|_, len| wrap_index(index, len))
    }

    fn navigate(&self, target_of: impl FnOnce(usize, usize) -> usize) -> NavigationOutcome {
        let len = self.items.len();
        if len == 0 {
            return NavigationOutcome::Ignored;
        }

        let target = {
            let mut state = self.state.lock();
            if state.transitioning {
                trace!("Navigation ignored while transitioning");
                return NavigationOutcome::Ignored;
            }
            let target = target_of(state.current, len);
            if target == state.current {
                return NavigationOutcome::Unchanged;
            }
            state.transitioning = true;
            target
        };

        debug!(target, "Starting transition");
        self.preload_around(target);

        let state = Arc::clone(&self.state);
        let delay = self.config.transition_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.lock();
            state.current = target;
            state.transitioning = false;
            trace!(index = target, "Transition committed");
        });

        NavigationOutcome::Started(Transition::new(target, handle))
    }

    /// Computes the preload window around `index`.
    #[must_use]
    pub fn compute_window(&self, index: usize, lookahead: usize) -> PreloadWindow {
        compute_window(self.items.len(), index, lookahead, self.config.shape)
    }

    /// Starts preloading the configured window around `index` in the background.
    ///
    /// Returns the window that was requested.
    pub fn preload_around(&self, index: usize) -> PreloadWindow {
        let window = self.compute_window(index, self.config.lookahead);
        if window.is_empty() {
            return window;
        }

        let high: Vec<String> = self.urls(&window.high);
        let low: Vec<String> = self.urls(&window.low);
        let preloader = self.preloader.clone();
        let options = self.config.options.clone();

        tokio::spawn(async move {
            if let Err(e) = preloader.preload_with_priority(&high, &low, &options).await {
                warn!(error = %e, "Preloading around cursor failed");
            }
        });

        window
    }

    /// Preloads around the committed cursor.
    pub fn preload_current(&self) -> PreloadWindow {
        self.preload_around(self.current_index())
    }

    fn urls(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .filter_map(|&i| self.items.get(i))
            .map(|item| item.image_url().to_string())
            .collect()
    }

    /// Returns up to `count` consecutive items from the cursor, wrapping.
    ///
    /// A collection shorter than `count` yields each item once.
    #[must_use]
    pub fn display_items(&self, count: usize) -> Vec<&T> {
        display_indices(self.items.len(), self.current_index(), count)
            .into_iter()
            .filter_map(|i| self.items.get(i))
            .collect()
    }

    /// Returns true if the image at `url` is in cache.
    #[must_use]
    pub fn is_image_preloaded(&self, url: &str) -> bool {
        self.preloader.is_preloaded(url)
    }

    /// Returns the preloader used by this navigator.
    #[must_use]
    pub fn preloader(&self) -> &ImagePreloader {
        &self.preloader
    }
}
