use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use folio::application::services::{ImagePreloader, PerformanceMonitor, PreloaderConfig};
use folio::application::use_cases::{CatalogPrefetchConfig, CatalogPrefetcher, NavigatorConfig};
use folio::domain::entities::{PreloadOptions, Project};
use folio::infrastructure::image::RESPONSIVE_SIZES;
use folio::infrastructure::{AppConfig, CliArgs, HttpImageFetcher, StorageManager, load_catalog};
use folio::presentation::widgets::StatusBar;
use folio::presentation::{App, AppSettings};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

async fn load_projects(config: &AppConfig) -> (Vec<Project>, Option<StatusBar>) {
    let Some(path) = config.catalog.as_deref() else {
        warn!("No catalog configured");
        return (
            Vec::new(),
            Some(StatusBar::warning("No catalog configured, pass --catalog <PATH>")),
        );
    };

    match load_catalog(path).await {
        Ok(projects) => (projects, None),
        Err(e) => {
            error!(error = %e, "Failed to load catalog");
            (Vec::new(), Some(StatusBar::error(e.to_string())))
        }
    }
}

async fn create_app() -> Result<App> {
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);

    init_logging(&config)?;

    info!(version = folio::VERSION, "Starting folio");

    let fetcher = Arc::new(HttpImageFetcher::from_config(&config.images)?);
    let monitor = Arc::new(PerformanceMonitor::new());
    if let Some(period) = config.preload.summary_interval() {
        monitor.spawn_periodic_summary(period);
    }

    let preloader = ImagePreloader::new(
        fetcher,
        PreloaderConfig {
            low_priority_delay: config.preload.low_priority_delay(),
        },
    )
    .with_monitor(monitor);

    let options = PreloadOptions::new()
        .with_width(config.images.width)
        .with_sizes(RESPONSIVE_SIZES);

    let prefetcher = CatalogPrefetcher::new(
        preloader.clone(),
        CatalogPrefetchConfig {
            initial_delay: config.preload.initial_delay(),
            high_priority_count: config.preload.initial_high_priority,
            options: options.clone(),
        },
    );

    let settings = AppSettings {
        navigator: NavigatorConfig {
            lookahead: config.preload.lookahead,
            shape: config.preload.window_shape(),
            transition_delay: config.navigation.transition_delay(),
            options,
        },
        category_transition_delay: config.navigation.category_transition_delay(),
        visible_cards: config.navigation.visible_cards,
    };

    let (projects, status) = load_projects(&config).await;
    let state = storage.load_state().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load browsing state");
        folio::infrastructure::StateConfig::default()
    });

    let mut app = App::new(projects, preloader, prefetcher, settings, state).with_storage(storage);
    if let Some(status) = status {
        app = app.with_status(status);
    }

    Ok(app)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let app = create_app().await?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
