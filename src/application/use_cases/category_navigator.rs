//! Category switching with the same transition cooldown as the carousel.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, trace};

use super::project_navigator::{NavigationOutcome, Transition};

/// Default cooldown of a category change.
pub const DEFAULT_CATEGORY_TRANSITION_DELAY: Duration = Duration::from_millis(200);

/// Current category with change notifications.
#[derive(Debug)]
pub struct CategoryNavigator<C> {
    sender: Arc<watch::Sender<C>>,
    transitioning: Arc<AtomicBool>,
    transition_delay: Duration,
}

impl<C> CategoryNavigator<C>
where
    C: Clone + PartialEq + Debug + Send + Sync + 'static,
{
    /// Creates a navigator starting at `initial`.
    #[must_use]
    pub fn new(initial: C, transition_delay: Duration) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            transitioning: Arc::new(AtomicBool::new(false)),
            transition_delay,
        }
    }

    /// Returns the committed category.
    #[must_use]
    pub fn current(&self) -> C {
        self.sender.borrow().clone()
    }

    /// Returns true while a change is pending.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transitioning.load(Ordering::SeqCst)
    }

    /// Subscribes to committed changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<C> {
        self.sender.subscribe()
    }

    /// Switches to `category` after the transition delay.
    ///
    /// Ignored while another change is pending; unchanged if `category` is
    /// already current.
    pub fn change(&self, category: C) -> NavigationOutcome<C> {
        if *self.sender.borrow() == category {
            return NavigationOutcome::Unchanged;
        }
        if self
            .transitioning
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            trace!("Category change ignored while transitioning");
            return NavigationOutcome::Ignored;
        }

        debug!(?category, "Changing category");

        let sender = Arc::clone(&self.sender);
        let transitioning = Arc::clone(&self.transitioning);
        let delay = self.transition_delay;
        let next = category.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sender.send_replace(next);
            transitioning.store(false, Ordering::SeqCst);
        });

        NavigationOutcome::Started(Transition::new(category, handle))
    }
}
