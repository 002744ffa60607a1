use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::domain::date::{format_local_date_time, format_utc_date};
use crate::domain::task::{Task, TaskStatus};

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Gray,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Done => Color::Green,
    }
}

pub fn status_chip(status: TaskStatus) -> Span<'static> {
    let style = match status {
        // Outlined for "to do", filled for the others.
        TaskStatus::Todo => Style::default().fg(status_color(status)),
        _ => Style::default().fg(Color::Black).bg(status_color(status)),
    };
    Span::styled(format!(" {} ", status.label()), style.add_modifier(Modifier::BOLD))
}

/// A task card with its own displayed status.
///
/// The displayed status moves ahead of the server on an inline change and is
/// put back if the change fails. A new status from the server always wins.
#[derive(Debug, Clone)]
pub struct TaskItem {
    task: Task,
    status: TaskStatus,
}

impl TaskItem {
    pub fn new(task: Task) -> Self {
        let status = task.status;
        Self { task, status }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn sync(&mut self, task: Task) {
        if task.status != self.task.status {
            self.status = task.status;
        }
        self.task = task;
    }

    /// Shows `next` right away and returns the status to restore on failure,
    /// or `None` when nothing changes.
    pub fn begin_status_change(&mut self, next: TaskStatus) -> Option<TaskStatus> {
        if next == self.status {
            return None;
        }
        let previous = self.status;
        self.status = next;
        Some(previous)
    }

    pub fn revert_status(&mut self, previous: TaskStatus) {
        self.status = previous;
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let task = &self.task;
        let muted = Style::default().fg(Color::DarkGray);
        let mut lines = vec![Line::from(status_chip(self.status))];

        if task.description.is_empty() {
            lines.push(Line::from(Span::styled("No description", muted.add_modifier(Modifier::ITALIC))));
        } else {
            lines.push(Line::from(task.description.clone()));
        }
        lines.push(Line::default());

        if let Some(priority) = task.priority {
            lines.push(Line::from(Span::styled(format!("Priority: {priority}"), muted)));
        }
        if let Some(due_date) = task.due_date {
            lines.push(Line::from(Span::styled(format!("Due: {}", format_utc_date(due_date.unix_seconds())), muted)));
        }
        lines.push(Line::from(Span::styled(format!("Created: {}", format_local_date_time(task.created_at.timestamp())), muted)));
        lines.push(Line::from(Span::styled(format!("Updated: {}", format_local_date_time(task.updated_at.timestamp())), muted)));
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, selected: bool) {
        let border = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if selected { BorderType::Thick } else { BorderType::Rounded })
            .border_style(border)
            .title(Span::styled(self.task.title.clone(), Style::default().add_modifier(Modifier::BOLD)));
        frame.render_widget(Paragraph::new(self.lines()).wrap(Wrap { trim: true }).block(block), area);
    }
}
