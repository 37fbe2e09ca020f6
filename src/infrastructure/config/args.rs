use super::app_config::LogLevel;
use crate::domain::entities::ConnectionQuality;
use clap::{Parser, ValueEnum};
use std::convert::Infallible;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Browse a portfolio project catalog with image prefetching",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Project catalog file (TOML or JSON).
    #[arg(long, value_name = "PATH", env = "FOLIO_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Base URL for site-relative image paths.
    #[arg(long, value_name = "URL", env = "FOLIO_BASE_URL")]
    pub base_url: Option<String>,

    /// Local directory serving site-relative image paths.
    #[arg(long, value_name = "PATH")]
    pub assets_dir: Option<PathBuf>,

    /// Image optimizer endpoint.
    #[arg(long, value_name = "URL")]
    pub optimizer_endpoint: Option<String>,

    /// Connection class used to pick image quality: `slow`, `normal`, `fast`
    /// or an effective type such as `3g`.
    #[arg(long, value_name = "CLASS", env = "FOLIO_CONNECTION", value_parser = parse_connection)]
    pub connection: Option<ConnectionQuality>,

    /// Items preloaded in the background past the visible ones.
    #[arg(long)]
    pub lookahead: Option<usize>,

    /// Project transition cooldown in milliseconds.
    #[arg(long)]
    pub transition_delay_ms: Option<u64>,

    /// Number of project cards shown at once.
    #[arg(long)]
    pub visible_cards: Option<usize>,
}

fn parse_connection(value: &str) -> Result<ConnectionQuality, Infallible> {
    Ok(ConnectionQuality::from_str(value, true)
        .unwrap_or_else(|_| ConnectionQuality::from_effective_type(value)))
}
