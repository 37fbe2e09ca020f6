//! Preload window value object.

/// Indices selected for preloading around a cursor.
///
/// Both sets are deduplicated, disjoint and within `[0, len)` of the
/// collection they were computed for. Ordering is by distance from the
/// cursor, so callers can issue requests front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadWindow {
    /// Indices loaded first and awaited.
    pub high: Vec<usize>,
    /// Indices loaded in the background.
    pub low: Vec<usize>,
}

impl PreloadWindow {
    /// Returns true if neither set holds an index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.low.is_empty()
    }

    /// Returns the total number of indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.high.len() + self.low.len()
    }

    /// Iterates high indices, then low indices.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.high.iter().chain(self.low.iter()).copied()
    }
}

/// Shape of the window relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowShape {
    /// Items after the cursor loaded with high priority (the cursor itself is always high).
    pub high_ahead: usize,
    /// Items before the cursor loaded with low priority.
    pub behind: usize,
}

impl Default for WindowShape {
    fn default() -> Self {
        Self {
            high_ahead: 2,
            behind: 1,
        }
    }
}
