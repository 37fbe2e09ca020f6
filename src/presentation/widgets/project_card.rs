use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::domain::entities::{PreloadStatus, Project};

/// Cover image state as shown on a card.
fn image_label(status: Option<&PreloadStatus>) -> (&'static str, Style) {
    match status {
        Some(PreloadStatus::Loaded) => ("● image ready", Style::default().fg(Color::Green)),
        Some(PreloadStatus::Pending) => ("◐ loading image", Style::default().fg(Color::Yellow)),
        Some(PreloadStatus::Failed(_)) => ("✕ image failed", Style::default().fg(Color::Red)),
        None => ("○ not requested", Style::default().fg(Color::DarkGray)),
    }
}

/// One project of the carousel.
pub struct ProjectCard<'a> {
    project: &'a Project,
    image: Option<PreloadStatus>,
    focused: bool,
    dimmed: bool,
}

impl<'a> ProjectCard<'a> {
    #[must_use]
    pub const fn new(project: &'a Project) -> Self {
        Self {
            project,
            image: None,
            focused: false,
            dimmed: false,
        }
    }

    #[must_use]
    pub fn image_status(mut self, status: Option<PreloadStatus>) -> Self {
        self.image = status;
        self
    }

    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Renders faded, used while the carousel is moving.
    #[must_use]
    pub const fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let project = self.project;
        let (label, label_style) = image_label(self.image.as_ref());

        let mut lines = vec![
            Line::from(Span::styled(label, label_style)),
            Line::from(Span::styled(
                project.category.to_string(),
                Style::default().fg(Color::Magenta),
            )),
            Line::default(),
        ];

        if !project.description.is_empty() {
            lines.push(Line::from(project.description.as_str()));
            lines.push(Line::default());
        }

        if !project.technologies.is_empty() {
            lines.push(Line::from(Span::styled(
                project.technologies.join(" · "),
                Style::default().fg(Color::Cyan),
            )));
        }

        for feature in &project.features {
            lines.push(Line::from(format!("• {feature}")));
        }

        for (name, link) in [("code", &project.github_url), ("live", &project.live_url)] {
            if let Some(url) = link {
                lines.push(Line::from(vec![
                    Span::styled(format!("{name}: "), Style::default().fg(Color::DarkGray)),
                    Span::raw(url.as_str()),
                ]));
            }
        }

        lines
    }
}

impl Widget for ProjectCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(format!(" {} ", self.project.title));

        let mut paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: true });
        if self.dimmed {
            paragraph = paragraph.style(Style::default().add_modifier(Modifier::DIM));
        }
        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ProjectCategory, sample_project};

    fn rendered(card: ProjectCard<'_>) -> Vec<String> {
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        card.render(area, &mut buf);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_card_shows_title_and_image_state() {
        let project = sample_project("folio", ProjectCategory::Web);
        let rows = rendered(ProjectCard::new(&project).image_status(Some(PreloadStatus::Loaded)));

        assert!(rows[0].contains("Project folio"));
        assert!(rows[1].contains("image ready"));
        assert!(rows[2].contains("Web"));
        assert!(rows.iter().any(|row| row.contains("Rust")));
    }

    #[test]
    fn test_failed_image_label() {
        let (label, _) = image_label(Some(&PreloadStatus::Failed("HTTP 404".to_string())));
        assert_eq!(label, "✕ image failed");
        let (label, _) = image_label(None);
        assert_eq!(label, "○ not requested");
    }
}
