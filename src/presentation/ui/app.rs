//! Main application orchestrator.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info, trace, warn};

use crate::application::services::ImagePreloader;
use crate::application::use_cases::{
    CatalogPrefetcher, CategoryNavigator, DEFAULT_CATEGORY_TRANSITION_DELAY, NavigationOutcome,
    NavigatorConfig, ProjectNavigator,
};
use crate::domain::entities::{CategoryFilter, ImageItem, Priority, Project, filter_projects};
use crate::infrastructure::config::{StateConfig, StorageManager};
use crate::presentation::events::{EventResult, KeyCommand};
use crate::presentation::widgets::{CarouselStatus, HeaderBar, ProjectCard, StatusBar};

const TICK_RATE: Duration = Duration::from_millis(100);
const MAX_VISIBLE_CARDS: usize = 5;

/// Tunables of the viewer.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Carousel behaviour.
    pub navigator: NavigatorConfig,
    /// Cooldown of a category switch.
    pub category_transition_delay: Duration,
    /// Cards rendered side by side.
    pub visible_cards: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            navigator: NavigatorConfig::default(),
            category_transition_delay: DEFAULT_CATEGORY_TRANSITION_DELAY,
            visible_cards: 3,
        }
    }
}

pub struct App {
    catalog: Arc<[Project]>,
    preloader: ImagePreloader,
    prefetcher: CatalogPrefetcher,
    navigator: ProjectNavigator<Project>,
    categories: CategoryNavigator<CategoryFilter>,
    category_rx: watch::Receiver<CategoryFilter>,
    settings: AppSettings,
    storage: Option<StorageManager>,
    state: StateConfig,
    status: Option<StatusBar>,
    /// Images already reported as shown.
    displayed: HashSet<String>,
    running: bool,
}

impl App {
    #[must_use]
    pub fn new(
        catalog: Vec<Project>,
        preloader: ImagePreloader,
        prefetcher: CatalogPrefetcher,
        settings: AppSettings,
        state: StateConfig,
    ) -> Self {
        let catalog: Arc<[Project]> = catalog.into();
        let filter = state.category_filter();
        let categories = CategoryNavigator::new(filter, settings.category_transition_delay);
        let category_rx = categories.subscribe();
        let navigator = Self::build_navigator(&catalog, filter, &preloader, &settings.navigator);

        Self {
            catalog,
            preloader,
            prefetcher,
            navigator,
            categories,
            category_rx,
            settings,
            storage: None,
            state,
            status: None,
            displayed: HashSet::new(),
            running: true,
        }
    }

    /// Persists browsing state through `storage` on exit.
    #[must_use]
    pub fn with_storage(mut self, storage: StorageManager) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Shows `status` until the next key press.
    #[must_use]
    pub fn with_status(mut self, status: StatusBar) -> Self {
        self.status = Some(status);
        self
    }

    fn build_navigator(
        catalog: &[Project],
        filter: CategoryFilter,
        preloader: &ImagePreloader,
        config: &NavigatorConfig,
    ) -> ProjectNavigator<Project> {
        let items: Arc<[Project]> = filter_projects(catalog, filter).into();
        ProjectNavigator::new(items, preloader.clone(), config.clone())
    }

    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.start();
        self.run_event_loop(terminal).await?;
        self.save_state();
        info!("Application exiting normally");
        Ok(())
    }

    fn start(&self) {
        if self.catalog.is_empty() {
            warn!("Catalog is empty, nothing to prefetch");
        } else {
            self.prefetcher
                .spawn_catalog_prefetch(Arc::clone(&self.catalog));
        }

        let window = self.navigator.preload_current();
        debug!(high = ?window.high, low = ?window.low, "Initial preload window");
        self.restore_last_project();
    }

    fn restore_last_project(&self) {
        let Some(id) = self.state.last_project_id.as_deref() else {
            return;
        };
        if let Some(index) = self.navigator.items().iter().position(|p| p.id == id) {
            debug!(id, index, "Restoring last project");
            Self::report(&self.navigator.go_to(index));
        }
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut tick = interval(TICK_RATE);

        self.load_visible_images();
        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            let terminal_event = terminal_events.next();

            tokio::select! {
                Some(Ok(event)) = terminal_event => {
                    if let Event::Key(key) = event
                        && self.handle_key(key) == EventResult::Exit
                    {
                        self.running = false;
                    }
                }

                Ok(()) = self.category_rx.changed() => {
                    let filter = *self.category_rx.borrow_and_update();
                    self.apply_category(filter);
                }

                _ = tick.tick() => {}
            }

            self.load_visible_images();
            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        let Some(command) = KeyCommand::from_key(&key) else {
            return EventResult::Continue;
        };
        self.status = None;

        match command {
            KeyCommand::Quit => return EventResult::Exit,
            KeyCommand::Next => Self::report(&self.navigator.next()),
            KeyCommand::Previous => Self::report(&self.navigator.previous()),
            KeyCommand::GoTo(index) => {
                if index < self.navigator.len() {
                    Self::report(&self.navigator.go_to(index));
                } else {
                    trace!(index, len = self.navigator.len(), "No card at index");
                }
            }
            KeyCommand::CycleCategory => {
                let next = self.categories.current().cycle();
                Self::report(&self.categories.change(next));
            }
        }

        EventResult::Consumed
    }

    fn report<K: std::fmt::Debug>(outcome: &NavigationOutcome<K>) {
        match outcome {
            NavigationOutcome::Started(transition) => {
                trace!(to = ?transition.target, "Transition started");
            }
            NavigationOutcome::Ignored => trace!("Navigation ignored"),
            NavigationOutcome::Unchanged => trace!("Navigation target already current"),
        }
    }

    fn apply_category(&mut self, filter: CategoryFilter) {
        info!(%filter, "Category changed");
        self.state.set_category_filter(filter);
        self.navigator = Self::build_navigator(
            &self.catalog,
            filter,
            &self.preloader,
            &self.settings.navigator,
        );

        if self.navigator.is_empty() {
            self.status = Some(StatusBar::warning(format!("No {filter} projects")));
            return;
        }

        self.navigator.preload_current();
        self.prefetcher
            .spawn_category_prefetch(Arc::clone(&self.catalog), filter);
    }

    fn visible_card_count(&self) -> usize {
        self.settings.visible_cards.clamp(1, MAX_VISIBLE_CARDS)
    }

    /// Loads the images of the visible cards, reporting each the first time it
    /// is shown. The focused card loads at high priority.
    fn load_visible_images(&mut self) {
        let count = self.visible_card_count();
        for (i, project) in self.navigator.display_items(count).into_iter().enumerate() {
            let url = project.image_url();
            if !self.displayed.insert(url.to_string()) {
                continue;
            }

            let priority = if i == 0 { Priority::High } else { Priority::Low };
            let options = self.settings.navigator.options.clone().with_priority(priority);
            let preloader = self.preloader.clone();
            let url = url.to_string();
            tokio::spawn(async move {
                if let Err(e) = preloader.load_for_display(&url, &options).await {
                    debug!(error = %e, "Showing fallback for project image");
                }
            });
        }
    }

    fn carousel_status(&self) -> CarouselStatus {
        if self.navigator.is_empty() {
            CarouselStatus::Empty
        } else if self.navigator.is_transitioning() || self.categories.is_transitioning() {
            CarouselStatus::Transitioning
        } else {
            CarouselStatus::Idle
        }
    }

    fn render(&self, frame: &mut Frame) {
        let [header_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let carousel = self.carousel_status();
        frame.render_widget(
            HeaderBar::new(crate::NAME, crate::VERSION)
                .category(self.categories.current())
                .position(self.navigator.current_index(), self.navigator.len())
                .status(carousel),
            header_area,
        );

        self.render_cards(frame, body_area, carousel == CarouselStatus::Transitioning);

        let mut bar = self
            .status
            .clone()
            .unwrap_or_default()
            .stats(self.preloader.stats());
        if let Some(monitor) = self.preloader.monitor() {
            let summary = monitor.summary();
            if summary.total_images > 0 {
                bar = bar.performance(summary.to_string());
            }
        }
        frame.render_widget(&bar, status_area);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect, dimmed: bool) {
        let count = self.visible_card_count();
        let projects = self.navigator.display_items(count);
        if projects.is_empty() {
            frame.render_widget(
                Paragraph::new("No projects to show").alignment(Alignment::Center),
                area,
            );
            return;
        }

        let shown = u32::try_from(projects.len()).unwrap_or(1);
        let areas = Layout::horizontal(vec![Constraint::Ratio(1, shown); projects.len()])
            .split(area);

        for (i, (project, card_area)) in projects.iter().zip(areas.iter()).enumerate() {
            let card = ProjectCard::new(project)
                .image_status(self.preloader.status(project.image_url()))
                .focused(i == 0)
                .dimmed(dimmed);
            frame.render_widget(card, *card_area);
        }
    }

    fn save_state(&mut self) {
        self.state.last_project_id = self.navigator.current_item().map(|p| p.id.clone());
        self.state.set_category_filter(self.categories.current());

        if let Some(storage) = &self.storage
            && let Err(e) = storage.save_state(&self.state)
        {
            warn!(error = %e, "Failed to save browsing state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::PerformanceMonitor;
    use crate::application::use_cases::CatalogPrefetchConfig;
    use crate::domain::entities::PreloadOptions;
    use crate::domain::entities::{ProjectCategory, sample_project};
    use crate::domain::ports::mocks::MockImageFetcher;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app(state: StateConfig) -> App {
        let preloader = ImagePreloader::with_defaults(Arc::new(MockImageFetcher::new()));
        let prefetcher = CatalogPrefetcher::new(preloader.clone(), CatalogPrefetchConfig::default());
        let catalog = vec![
            sample_project("a", ProjectCategory::Web),
            sample_project("b", ProjectCategory::Ai),
            sample_project("c", ProjectCategory::Web),
        ];
        App::new(catalog, preloader, prefetcher, AppSettings::default(), state)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_visible_images_are_reported_once() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let monitor = Arc::new(PerformanceMonitor::new());
        let preloader = ImagePreloader::with_defaults(fetcher.clone()).with_monitor(monitor.clone());
        let prefetcher = CatalogPrefetcher::new(preloader.clone(), CatalogPrefetchConfig::default());
        let catalog = vec![
            sample_project("a", ProjectCategory::Web),
            sample_project("b", ProjectCategory::Ai),
            sample_project("c", ProjectCategory::Web),
        ];
        let first_image = catalog[0].image_url().to_string();
        let mut app = App::new(
            catalog,
            preloader.clone(),
            prefetcher,
            AppSettings::default(),
            StateConfig::default(),
        );

        preloader
            .preload_one(&first_image, &PreloadOptions::new())
            .await
            .unwrap();
        app.load_visible_images();
        app.load_visible_images();
        while monitor.summary().total_images < 3 {
            tokio::task::yield_now().await;
        }

        let summary = monitor.summary();
        assert_eq!(summary.total_images, 3);
        assert_eq!(summary.preloaded_images, 1);
        assert_eq!(
            monitor.metrics_for(&first_image).map(|m| m.priority),
            Some(Priority::High)
        );
        assert_eq!(fetcher.calls_for(&first_image), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrow_moves_carousel() {
        let mut app = app(StateConfig::default());

        assert_eq!(app.handle_key(key(KeyCode::Right)), EventResult::Consumed);
        assert_eq!(app.carousel_status(), CarouselStatus::Transitioning);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(app.navigator.current_index(), 1);
        assert_eq!(app.carousel_status(), CarouselStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_digit_is_ignored() {
        let mut app = app(StateConfig::default());

        app.handle_key(key(KeyCode::Char('9')));
        assert!(!app.navigator.is_transitioning());
        assert_eq!(app.handle_key(key(KeyCode::Enter)), EventResult::Continue);
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), EventResult::Exit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_category_change_rebuilds_navigator() {
        let mut app = app(StateConfig::default());

        app.handle_key(key(KeyCode::Tab));
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert!(app.category_rx.has_changed().unwrap());
        let filter = *app.category_rx.borrow_and_update();
        assert_eq!(filter, CategoryFilter::Only(ProjectCategory::Web));

        app.apply_category(filter);
        let ids: Vec<_> = app.navigator.items().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(app.state.last_category.as_deref(), Some("web"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restores_saved_category_and_project() {
        let state = StateConfig {
            last_project_id: Some("c".to_string()),
            last_category: Some("web".to_string()),
        };
        let app = app(state);
        assert_eq!(app.navigator.len(), 2);

        app.restore_last_project();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(app.navigator.current_item().map(|p| p.id.as_str()), Some("c"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_state_records_position() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(StateConfig::default())
            .with_storage(StorageManager::with_dir(dir.path().to_path_buf()));

        app.handle_key(key(KeyCode::Char('2')));
        tokio::time::sleep(Duration::from_millis(200)).await;
        app.save_state();

        let saved = StorageManager::with_dir(dir.path().to_path_buf())
            .load_state()
            .unwrap();
        assert_eq!(saved.last_project_id.as_deref(), Some("b"));
        assert_eq!(saved.last_category, None);
    }
}
