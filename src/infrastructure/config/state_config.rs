use serde::{Deserialize, Serialize};

use crate::domain::entities::{CategoryFilter, ProjectCategory};

/// Browsing state persisted between sessions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    /// Project shown when the viewer was closed.
    #[serde(default)]
    pub last_project_id: Option<String>,

    /// Category filter active when the viewer was closed (`all` when unset).
    #[serde(default)]
    pub last_category: Option<String>,
}

impl StateConfig {
    /// Returns the persisted category filter, falling back to all projects.
    #[must_use]
    pub fn category_filter(&self) -> CategoryFilter {
        match self.last_category.as_deref() {
            Some("web") => CategoryFilter::Only(ProjectCategory::Web),
            Some("mobile") => CategoryFilter::Only(ProjectCategory::Mobile),
            Some("desktop") => CategoryFilter::Only(ProjectCategory::Desktop),
            Some("ai") => CategoryFilter::Only(ProjectCategory::Ai),
            Some("other") => CategoryFilter::Only(ProjectCategory::Other),
            _ => CategoryFilter::All,
        }
    }

    /// Records a category filter.
    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.last_category = match filter {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(category.to_string().to_lowercase()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_round_trip() {
        let mut state = StateConfig::default();
        assert_eq!(state.category_filter(), CategoryFilter::All);

        state.set_category_filter(CategoryFilter::Only(ProjectCategory::Ai));
        assert_eq!(state.last_category.as_deref(), Some("ai"));
        assert_eq!(
            state.category_filter(),
            CategoryFilter::Only(ProjectCategory::Ai)
        );

        state.set_category_filter(CategoryFilter::All);
        assert_eq!(state.last_category, None);
    }
}
