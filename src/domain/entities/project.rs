//! Portfolio project entity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Anything the navigator can preload an image for.
pub trait ImageItem {
    /// Returns the image source URL of the item.
    fn image_url(&self) -> &str;
}

impl ImageItem for String {
    fn image_url(&self) -> &str {
        self
    }
}

impl ImageItem for &'static str {
    fn image_url(&self) -> &str {
        self
    }
}

/// Kind of project shown in the showcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    /// Web application.
    Web,
    /// Mobile application.
    Mobile,
    /// Desktop application.
    Desktop,
    /// Machine learning / AI project.
    Ai,
    /// Anything else.
    #[default]
    Other,
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web => write!(f, "Web"),
            Self::Mobile => write!(f, "Mobile"),
            Self::Desktop => write!(f, "Desktop"),
            Self::Ai => write!(f, "AI"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Category selection applied to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every project.
    #[default]
    All,
    /// Projects of a single category.
    Only(ProjectCategory),
}

impl CategoryFilter {
    /// Returns true if the project passes the filter.
    #[must_use]
    pub fn matches(self, project: &Project) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => project.category == category,
        }
    }

    /// Cycles All -> Web -> AI -> All.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::All => Self::Only(ProjectCategory::Web),
            Self::Only(ProjectCategory::Web) => Self::Only(ProjectCategory::Ai),
            Self::Only(_) => Self::All,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Only(category) => category.fmt(f),
        }
    }
}

/// A project card in the showcase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Cover image source (absolute URL or site-relative path).
    pub image: String,
    /// Technologies used.
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Feature bullet points.
    #[serde(default)]
    pub features: Vec<String>,
    /// Source repository link.
    #[serde(default, rename = "githubUrl", alias = "github_url")]
    pub github_url: Option<String>,
    /// Live deployment link.
    #[serde(default, rename = "liveUrl", alias = "live_url")]
    pub live_url: Option<String>,
    /// Project kind.
    #[serde(default)]
    pub category: ProjectCategory,
}

impl ImageItem for Project {
    fn image_url(&self) -> &str {
        &self.image
    }
}

/// Returns the projects that pass the filter, in catalog order.
#[must_use]
pub fn filter_projects(projects: &[Project], filter: CategoryFilter) -> Vec<Project> {
    projects
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_project(id: &str, category: ProjectCategory) -> Project {
    Project {
        id: id.to_string(),
        title: format!("Project {id}"),
        description: String::new(),
        image: format!("/images/{id}.webp"),
        technologies: vec!["Rust".to_string()],
        features: Vec::new(),
        github_url: None,
        live_url: None,
        category,
    }
}
