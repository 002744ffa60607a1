use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub const AUTO_HIDE: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    fn color(self) -> Color {
        match self {
            Severity::Success => Color::Green,
            Severity::Error => Color::Red,
            Severity::Info => Color::Blue,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

/// One transient message at a time; a newer message replaces the current one.
#[derive(Debug, Default)]
pub struct Notifications {
    current: Option<Notice>,
}

impl Notifications {
    pub fn show(&mut self, severity: Severity, message: impl Into<String>) {
        self.current = Some(Notice { message: message.into(), severity, shown_at: Instant::now() });
    }

    pub fn show_success(&mut self, message: impl Into<String>) { self.show(Severity::Success, message) }
    pub fn show_error(&mut self, message: impl Into<String>) { self.show(Severity::Error, message) }
    pub fn show_info(&mut self, message: impl Into<String>) { self.show(Severity::Info, message) }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Hides the current message once it has been visible for [`AUTO_HIDE`].
    pub fn tick(&mut self, now: Instant) {
        if self
            .current
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.shown_at) >= AUTO_HIDE)
        {
            self.current = None;
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(notice) = &self.current else { return };
        let width = (notice.message.chars().count() as u16 + 4).clamp(20, area.width.saturating_sub(4).max(20));
        let width = width.min(area.width);
        let lines = (notice.message.chars().count() as u16 / width.saturating_sub(4).max(1)) + 1;
        let height = (lines + 2).min(area.height);
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + area.height.saturating_sub(height + 1),
            width,
            height,
        };
        let style = Style::default().fg(Color::White).bg(notice.severity.color()).add_modifier(Modifier::BOLD);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(notice.message.as_str())
                .style(style)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).style(style)),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_message_wins() {
        let mut notifications = Notifications::default();
        notifications.show_success("Task created");
        notifications.show_error("Failed to save task");
        let notice = notifications.current().unwrap();
        assert_eq!(notice.message, "Failed to save task");
        assert_eq!(notice.severity, Severity::Error);
    }

    #[test]
    fn auto_hides_after_timeout() {
        let mut notifications = Notifications::default();
        notifications.show_info("Saved");
        let shown_at = notifications.current().unwrap().shown_at;
        notifications.tick(shown_at + Duration::from_millis(3999));
        assert!(notifications.current().is_some());
        notifications.tick(shown_at + AUTO_HIDE);
        assert!(notifications.current().is_none());
    }
}
