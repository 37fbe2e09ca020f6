//! Project catalog loading.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entities::Project;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml catalog: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid json catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

/// Catalog file encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    /// Picks the format from the file extension.
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` for anything but `.toml` and `.json`.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(CatalogError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCatalog {
    List(Vec<Project>),
    Wrapped(CatalogFile),
}

/// Parses catalog content.
///
/// TOML catalogs hold a `[[projects]]` array. JSON catalogs are either a bare
/// array or an object with a `projects` array.
///
/// # Errors
/// Returns error if the content does not match the format.
pub fn parse_catalog(content: &str, format: CatalogFormat) -> Result<Vec<Project>, CatalogError> {
    let projects = match format {
        CatalogFormat::Toml => toml::from_str::<CatalogFile>(content)?.projects,
        CatalogFormat::Json => match serde_json::from_str::<JsonCatalog>(content)? {
            JsonCatalog::List(projects) | JsonCatalog::Wrapped(CatalogFile { projects }) => {
                projects
            }
        },
    };

    let mut seen = HashSet::new();
    for project in &projects {
        if !seen.insert(project.id.as_str()) {
            warn!(id = %project.id, "Duplicate project id in catalog");
        }
    }

    Ok(projects)
}

/// Reads and parses the catalog at `path`.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub async fn load_catalog(path: &Path) -> Result<Vec<Project>, CatalogError> {
    let format = CatalogFormat::from_path(path)?;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let projects = parse_catalog(&content, format)?;
    info!(path = %path.display(), count = projects.len(), "Loaded project catalog");
    Ok(projects)
}
