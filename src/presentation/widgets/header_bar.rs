use crate::domain::entities::CategoryFilter;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Carousel state shown on the right of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarouselStatus {
    #[default]
    Idle,
    Transitioning,
    Empty,
}

impl CarouselStatus {
    const fn display_text(self) -> &'static str {
        match self {
            Self::Idle => "READY",
            Self::Transitioning => "MOVING",
            Self::Empty => "EMPTY",
        }
    }

    const fn indicator(self) -> &'static str {
        match self {
            Self::Idle => "●",
            Self::Transitioning => "◐",
            Self::Empty => "○",
        }
    }
}

pub struct HeaderBarStyle {
    pub background: Style,
    pub app_name: Style,
    pub version: Style,
    pub category: Style,
    pub status_idle: Style,
    pub status_transitioning: Style,
    pub status_empty: Style,
}

impl Default for HeaderBarStyle {
    fn default() -> Self {
        Self {
            background: Style::default(),
            app_name: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            version: Style::default().fg(Color::DarkGray),
            category: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            status_idle: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            status_transitioning: Style::default().fg(Color::Yellow),
            status_empty: Style::default().fg(Color::DarkGray),
        }
    }
}

pub struct HeaderBar<'a> {
    app_name: &'a str,
    version: &'a str,
    category: CategoryFilter,
    position: Option<(usize, usize)>,
    status: CarouselStatus,
    style: HeaderBarStyle,
}

impl<'a> HeaderBar<'a> {
    #[must_use]
    pub fn new(app_name: &'a str, version: &'a str) -> Self {
        Self {
            app_name,
            version,
            category: CategoryFilter::default(),
            position: None,
            status: CarouselStatus::default(),
            style: HeaderBarStyle::default(),
        }
    }

    #[must_use]
    pub const fn category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// Sets the 0-based cursor and collection size.
    #[must_use]
    pub const fn position(mut self, index: usize, len: usize) -> Self {
        self.position = Some((index, len));
        self
    }

    #[must_use]
    pub const fn status(mut self, status: CarouselStatus) -> Self {
        self.status = status;
        self
    }

    const fn status_style(&self) -> Style {
        match self.status {
            CarouselStatus::Idle => self.style.status_idle,
            CarouselStatus::Transitioning => self.style.status_transitioning,
            CarouselStatus::Empty => self.style.status_empty,
        }
    }

    fn status_text(&self) -> String {
        let position = match self.position {
            Some((index, len)) if len > 0 => format!("{}/{len} ", index + 1),
            _ => String::new(),
        };
        format!(
            " {position}{} {} ",
            self.status.indicator(),
            self.status.display_text()
        )
    }
}

impl Widget for HeaderBar<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        for x in area.left()..area.right() {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.style.background);
        }

        let category = format!(" [{}] ", self.category);
        let left_line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.app_name.to_uppercase()),
                self.style.app_name,
            ),
            Span::raw(" "),
            Span::styled(format!(" v{} ", self.version), self.style.version),
            Span::styled(category.clone(), self.style.category),
        ]);
        let left_width = (self.app_name.chars().count()
            + 2
            + 1
            + self.version.chars().count()
            + 3
            + category.chars().count()) as u16;
        let left_area = Rect::new(area.x, area.y, left_width.min(area.width), 1);
        Paragraph::new(left_line).render(left_area, buf);

        let status = self.status_text();
        let status_width = status.chars().count() as u16;
        if status_width < area.width.saturating_sub(left_width) {
            let right_x = area.right().saturating_sub(status_width);
            let right_area = Rect::new(right_x, area.y, status_width, 1);
            Paragraph::new(Line::from(Span::styled(status, self.status_style())))
                .render(right_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ProjectCategory;

    fn rendered(header: HeaderBar<'_>, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        header.render(area, &mut buf);
        (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CarouselStatus::Idle.display_text(), "READY");
        assert_eq!(CarouselStatus::Transitioning.indicator(), "◐");
        assert_eq!(CarouselStatus::Empty.indicator(), "○");
    }

    #[test]
    fn test_header_shows_category_and_position() {
        let header = HeaderBar::new("folio", "0.1.0")
            .category(CategoryFilter::Only(ProjectCategory::Ai))
            .position(1, 4);

        let line = rendered(header, 60);
        assert!(line.starts_with(" FOLIO "));
        assert!(line.contains("[AI]"));
        assert!(line.trim_end().ends_with("2/4 ● READY"));
    }

    #[test]
    fn test_narrow_header_drops_status() {
        let header = HeaderBar::new("folio", "0.1.0").status(CarouselStatus::Transitioning);
        let line = rendered(header, 20);
        assert!(!line.contains("MOVING"));
    }
}
