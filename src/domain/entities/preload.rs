//! Domain types for image preloading.

use std::fmt;

/// Scheduling tier of a preload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    /// Critical-path images, awaited by the caller.
    High,
    /// Background images, scheduled after a delay.
    #[default]
    Low,
}

impl Priority {
    /// Returns true for the high tier.
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Load state of a tracked URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadStatus {
    /// A fetch is in flight.
    Pending,
    /// The image was fetched and decoded.
    Loaded,
    /// The last fetch failed with the given reason.
    Failed(String),
}

impl PreloadStatus {
    /// Returns true once the image is in cache.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }

    /// Returns true while a fetch is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the last fetch failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for PreloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Loaded => write!(f, "loaded"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Tracked state for one image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadEntry {
    /// Source URL, the unique key.
    pub url: String,
    /// Current load state.
    pub status: PreloadStatus,
    /// Tier of the request that created the current fetch.
    pub priority: Priority,
}

impl PreloadEntry {
    /// Creates a pending entry.
    #[must_use]
    pub fn pending(url: impl Into<String>, priority: Priority) -> Self {
        Self {
            url: url.into(),
            status: PreloadStatus::Pending,
            priority,
        }
    }
}

/// Hints passed along with a preload request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadOptions {
    /// Scheduling tier.
    pub priority: Priority,
    /// Encoding quality requested from an image optimizer (1-100).
    pub quality: Option<u8>,
    /// Responsive `sizes` hint.
    pub sizes: Option<String>,
    /// Target width requested from an image optimizer.
    pub width: Option<u32>,
}

impl PreloadOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the priority tier.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the requested quality.
    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality.clamp(1, 100));
        self
    }

    /// Sets the responsive sizes hint.
    #[must_use]
    pub fn with_sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }

    /// Sets the target width.
    #[must_use]
    pub const fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }
}

/// Counts of tracked entries by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadStats {
    /// Entries in `Loaded` state.
    pub preloaded: usize,
    /// Fetches currently in flight.
    pub pending: usize,
    /// Entries whose last fetch failed.
    pub failed: usize,
}

impl fmt::Display for PreloadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} preloaded, {} pending, {} failed",
            self.preloaded, self.pending, self.failed
        )
    }
}
