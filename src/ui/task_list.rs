use std::cell::Cell;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use super::task_item::TaskItem;
use crate::domain::task::{Task, TaskId};

pub const CARD_HEIGHT: u16 = 10;
const SKELETON_CARDS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Error(String),
    Loaded,
}

/// Number of grid columns for a given width.
pub fn columns_for(width: u16) -> usize {
    match width {
        w if w >= 120 => 3,
        w if w >= 80 => 2,
        _ => 1,
    }
}

/// The task grid. Keeps one [`TaskItem`] per task so local status changes
/// survive a refetch that does not touch them.
#[derive(Debug)]
pub struct TaskList {
    state: LoadState,
    items: Vec<TaskItem>,
    selected: usize,
    // Set on render; used for vertical movement.
    columns: Cell<usize>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self { state: LoadState::Loading, items: Vec::new(), selected: 0, columns: Cell::new(1) }
    }
}

impl TaskList {
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    pub fn set_loading(&mut self) {
        // A refetch over an existing grid keeps showing the grid.
        if self.state != LoadState::Loaded {
            self.state = LoadState::Loading;
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = LoadState::Error(message.into());
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        let selected_id = self.selected().map(|item| item.task().id);
        let mut previous = std::mem::take(&mut self.items);
        self.items = tasks
            .into_iter()
            .map(|task| match previous.iter().position(|item| item.task().id == task.id) {
                Some(index) => {
                    let mut item = previous.swap_remove(index);
                    item.sync(task);
                    item
                }
                None => TaskItem::new(task),
            })
            .collect();
        self.state = LoadState::Loaded;
        self.selected = selected_id
            .and_then(|id| self.position(&id))
            .unwrap_or(self.selected)
            .min(self.items.len().saturating_sub(1));
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.items.iter().position(|item| item.task().id == *id)
    }

    pub fn item_mut(&mut self, id: &TaskId) -> Option<&mut TaskItem> {
        self.items.iter_mut().find(|item| item.task().id == *id)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&TaskItem> {
        self.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let target = self.selected + self.columns.get();
        if target < self.items.len() {
            self.selected = target;
        }
    }

    pub fn select_up(&mut self) {
        if let Some(target) = self.selected.checked_sub(self.columns.get()) {
            self.selected = target;
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match &self.state {
            LoadState::Loading => self.render_skeleton(frame, area),
            LoadState::Error(message) => render_error(frame, area, message),
            LoadState::Loaded if self.items.is_empty() => render_empty(frame, area),
            LoadState::Loaded => self.render_grid(frame, area),
        }
    }

    fn render_skeleton(&self, frame: &mut Frame, area: Rect) {
        let columns = columns_for(area.width);
        self.columns.set(columns);
        let placeholder = Style::default().fg(Color::DarkGray);
        for rect in grid_cells(area, columns, SKELETON_CARDS) {
            let lines = vec![
                Line::from(Span::styled("░░░░░░░░░░░░", placeholder)),
                Line::from(Span::styled("░░░░░░░░░░░░░░░░░░░░", placeholder)),
                Line::from(Span::styled("░░░░░░░░", placeholder)),
            ];
            let block = Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).border_style(placeholder);
            frame.render_widget(Paragraph::new(lines).block(block), rect);
        }
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let columns = columns_for(area.width);
        self.columns.set(columns);

        let grid_area = Rect { height: area.height.saturating_sub(1), ..area };
        let visible_rows = (grid_area.height / CARD_HEIGHT).max(1) as usize;
        let selected_row = self.selected / columns;
        let first_row = selected_row.saturating_sub(visible_rows - 1);
        let first = first_row * columns;

        let cells = grid_cells(grid_area, columns, self.items.len() - first);
        for (offset, rect) in cells.into_iter().enumerate() {
            let index = first + offset;
            self.items[index].render(frame, rect, index == self.selected);
        }

        let action = Paragraph::new(Line::from(Span::styled(
            " [n] + Add task ",
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Right);
        let bottom = Rect { y: area.y + area.height.saturating_sub(1), height: area.height.min(1), ..area };
        frame.render_widget(action, bottom);
    }
}

/// Card rectangles for up to `count` cards, laid out row by row. Rows that
/// do not fit in `area` are dropped.
fn grid_cells(area: Rect, columns: usize, count: usize) -> Vec<Rect> {
    let mut cells = Vec::new();
    let rows = count.div_ceil(columns);
    for row in 0..rows {
        let y = area.y + row as u16 * CARD_HEIGHT;
        if y + CARD_HEIGHT > area.y + area.height && row > 0 {
            break;
        }
        let row_rect = Rect { y, height: CARD_HEIGHT.min(area.y + area.height - y), ..area };
        let row_cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_rect);
        let in_row = (count - row * columns).min(columns);
        cells.extend(row_cells.iter().take(in_row).copied());
    }
    cells
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled("Failed to load tasks", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))),
        Line::from(message.to_string()),
        Line::default(),
        Line::from(Span::styled("[r] Retry", Style::default().fg(Color::Cyan))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red))),
        area,
    );
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("No tasks yet", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled("Create your first task to get started.", Style::default().fg(Color::DarkGray))),
        Line::default(),
        Line::from(Span::styled("[n] Create task", Style::default().fg(Color::Cyan))),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(Block::default().borders(Borders::ALL)),
        area,
    );
}
