//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::entities::{ConnectionQuality, WindowShape};

const APP_NAME: &str = "folio";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Project catalog file (TOML or JSON).
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Image source configuration.
    #[serde(default)]
    pub images: ImageConfig,

    /// Preload scheduling configuration.
    #[serde(default)]
    pub preload: PreloadConfig,

    /// Navigation timing configuration.
    #[serde(default)]
    pub navigation: NavigationConfig,
}

/// Where images come from and how they are requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Base URL for site-relative image paths.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Local directory serving site-relative image paths. Wins over `base_url`.
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,

    /// Image optimizer endpoint (e.g. `https://example.com/_next/image`).
    #[serde(default)]
    pub optimizer_endpoint: Option<String>,

    /// Width requested from the optimizer and used to downscale decoded images.
    #[serde(default = "default_image_width")]
    pub width: u32,

    /// Number of decoded images kept in memory.
    #[serde(default = "default_memory_cache_size")]
    pub memory_cache_size: usize,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection class used to pick image quality.
    #[serde(default)]
    pub connection: ConnectionQuality,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            assets_dir: None,
            optimizer_endpoint: None,
            width: default_image_width(),
            memory_cache_size: default_memory_cache_size(),
            timeout_secs: default_timeout_secs(),
            connection: ConnectionQuality::default(),
        }
    }
}

/// Preload scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreloadConfig {
    /// Delay before a low-priority batch starts, in milliseconds.
    #[serde(default = "default_low_priority_delay_ms")]
    pub low_priority_delay_ms: u64,

    /// Items past the high-priority range preloaded in the background.
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,

    /// Items after the cursor preloaded with high priority.
    #[serde(default = "default_high_ahead")]
    pub high_ahead: usize,

    /// Items before the cursor preloaded in the background.
    #[serde(default = "default_behind")]
    pub behind: usize,

    /// Delay before the catalog-wide prefetch starts, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Leading catalog entries prefetched with high priority.
    #[serde(default = "default_initial_high_priority")]
    pub initial_high_priority: usize,

    /// Period of the performance summary log, in seconds. 0 disables it.
    #[serde(default = "default_summary_interval_secs")]
    pub summary_interval_secs: u64,
}

impl PreloadConfig {
    /// Returns the low-priority delay.
    #[must_use]
    pub const fn low_priority_delay(&self) -> Duration {
        Duration::from_millis(self.low_priority_delay_ms)
    }

    /// Returns the catalog prefetch delay.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Returns the window shape.
    #[must_use]
    pub const fn window_shape(&self) -> WindowShape {
        WindowShape {
            high_ahead: self.high_ahead,
            behind: self.behind,
        }
    }

    /// Returns the summary period, if enabled.
    #[must_use]
    pub const fn summary_interval(&self) -> Option<Duration> {
        if self.summary_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.summary_interval_secs))
        }
    }
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            low_priority_delay_ms: default_low_priority_delay_ms(),
            lookahead: default_lookahead(),
            high_ahead: default_high_ahead(),
            behind: default_behind(),
            initial_delay_ms: default_initial_delay_ms(),
            initial_high_priority: default_initial_high_priority(),
            summary_interval_secs: default_summary_interval_secs(),
        }
    }
}

/// Navigation timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Project transition cooldown, in milliseconds.
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,

    /// Category transition cooldown, in milliseconds.
    #[serde(default = "default_category_transition_delay_ms")]
    pub category_transition_delay_ms: u64,

    /// Number of project cards shown at once.
    #[serde(default = "default_visible_cards")]
    pub visible_cards: usize,
}

impl NavigationConfig {
    /// Returns the project transition delay.
    #[must_use]
    pub const fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    /// Returns the category transition delay.
    #[must_use]
    pub const fn category_transition_delay(&self) -> Duration {
        Duration::from_millis(self.category_transition_delay_ms)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: default_transition_delay_ms(),
            category_transition_delay_ms: default_category_transition_delay_ms(),
            visible_cards: default_visible_cards(),
        }
    }
}

fn default_image_width() -> u32 {
    640
}

fn default_memory_cache_size() -> usize {
    50
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_low_priority_delay_ms() -> u64 {
    1000
}

fn default_lookahead() -> usize {
    3
}

fn default_high_ahead() -> usize {
    2
}

fn default_behind() -> usize {
    1
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_initial_high_priority() -> usize {
    3
}

fn default_summary_interval_secs() -> u64 {
    30
}

fn default_transition_delay_ms() -> u64 {
    150
}

fn default_category_transition_delay_ms() -> u64 {
    200
}

fn default_visible_cards() -> usize {
    3
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(catalog) = args.catalog {
            self.catalog = Some(catalog);
        }
        if let Some(base_url) = args.base_url {
            self.images.base_url = Some(base_url);
        }
        if let Some(assets_dir) = args.assets_dir {
            self.images.assets_dir = Some(assets_dir);
        }
        if let Some(endpoint) = args.optimizer_endpoint {
            self.images.optimizer_endpoint = Some(endpoint);
        }
        if let Some(connection) = args.connection {
            self.images.connection = connection;
        }
        if let Some(lookahead) = args.lookahead {
            self.preload.lookahead = lookahead;
        }
        if let Some(delay) = args.transition_delay_ms {
            self.navigation.transition_delay_ms = delay;
        }
        if let Some(cards) = args.visible_cards {
            self.navigation.visible_cards = cards;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("folio.log"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            catalog: None,
            images: ImageConfig::default(),
            preload: PreloadConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }
}
