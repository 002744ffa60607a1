use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;

/// Blocking yes/no prompt. While `busy`, the confirm action is in flight and
/// the prompt ignores further input.
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub busy: bool,
}

impl ConfirmDialog {
    pub fn delete_task() -> Self {
        Self {
            title: "Delete task".into(),
            message: "This action cannot be undone.".into(),
            confirm_text: "Delete".into(),
            busy: false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(44, 7, area);
        let actions = if self.busy {
            Line::from(Span::styled("Working...", Style::default().fg(Color::DarkGray)))
        } else {
            Line::from(vec![
                Span::styled(format!("[y] {}", self.confirm_text), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw("   "),
                Span::raw("[n] Cancel"),
            ])
        };
        let body = vec![Line::from(self.message.as_str()), Line::default(), actions];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(body)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::Red))
                        .title(self.title.as_str()),
                ),
            popup,
        );
    }
}
