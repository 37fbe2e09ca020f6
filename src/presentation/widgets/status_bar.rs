//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::domain::entities::PreloadStats;

/// Key hints shown when there is nothing else to say.
pub const KEY_HINTS: &str = "←/→ move  1-9 jump  Tab category  q quit";

/// Status bar severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Informational.
    Info,
    /// Warning.
    Warning,
    /// Error.
    Error,
}

impl StatusLevel {
    /// Returns color for level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Bottom line with a message, key hints and preload counters.
#[derive(Debug, Clone)]
pub struct StatusBar {
    message: String,
    hints: String,
    stats: Option<PreloadStats>,
    performance: Option<String>,
    level: StatusLevel,
}

impl StatusBar {
    /// Creates a status bar showing only key hints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: String::new(),
            hints: KEY_HINTS.to_string(),
            stats: None,
            performance: None,
            level: StatusLevel::Info,
        }
    }

    /// Sets the message.
    #[must_use]
    pub fn message(mut self, content: impl Into<String>) -> Self {
        self.message = content.into();
        self
    }

    /// Sets the preload counters.
    #[must_use]
    pub const fn stats(mut self, stats: PreloadStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Sets the load performance summary.
    #[must_use]
    pub fn performance(mut self, summary: impl Into<String>) -> Self {
        self.performance = Some(summary.into());
        self
    }

    /// Sets status level.
    #[must_use]
    pub const fn level(mut self, level: StatusLevel) -> Self {
        self.level = level;
        self
    }

    /// Creates warning status bar.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new().message(message).level(StatusLevel::Warning)
    }

    /// Creates error status bar.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new().message(message).level(StatusLevel::Error)
    }

    fn right_text(&self) -> String {
        let stats = self.stats.map(|s| s.to_string());
        match (stats, &self.performance) {
            (Some(stats), Some(perf)) => format!("{perf} | {stats}"),
            (Some(stats), None) => stats,
            (None, Some(perf)) => perf.clone(),
            (None, None) => String::new(),
        }
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .fg(self.level.color())
            .add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(Color::DarkGray);

        let width = area.width as usize;
        let left = if self.message.is_empty() {
            &self.hints
        } else {
            &self.message
        };
        let left_style = if self.message.is_empty() { dim } else { style };
        let right = self.right_text();

        let left_len = left.chars().count();
        let right_len = right.chars().count();
        let padding = width.saturating_sub(left_len + right_len);

        let mut spans = vec![Span::styled(left.as_str(), left_style)];
        if padding > 0 {
            spans.push(Span::raw(" ".repeat(padding)));
        }
        if !right.is_empty() {
            spans.push(Span::styled(right, dim));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
