//! Create/edit popup.
//!
//! The form checks its input with the same rules the server applies, so a
//! submission only leaves the form once it would be accepted as far as the
//! client can tell.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use serde_json::Number;

use super::centered_rect;
use super::task_item::status_chip;
use crate::domain::patch::Patch;
use crate::domain::request::{CreateTaskRequest, UpdateTaskRequest};
use crate::domain::task::{DESCRIPTION_MAX, DueDate, TITLE_MAX, Task, TaskId, TaskStatus};
use crate::domain::validation::{self, Field, FieldError};

const PRIORITY_INPUT_MAX: usize = 4;
const DUE_DATE_INPUT_MAX: usize = 10;
const FIELD_ORDER: [Field; 5] = [Field::Title, Field::Description, Field::Status, Field::Priority, Field::DueDate];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(CreateTaskRequest),
    Update(TaskId, UpdateTaskRequest),
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    mode: FormMode,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: String,
    pub due_date: String,
    active: Field,
    errors: Vec<FieldError>,
    pub saving: bool,
}

impl TaskForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: String::new(),
            due_date: String::new(),
            active: Field::Title,
            errors: Vec::new(),
            saving: false,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            mode: FormMode::Edit(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority.map(|p| p.to_string()).unwrap_or_default(),
            due_date: task.due_date.map(DueDate::to_date_input).unwrap_or_default(),
            ..Self::create()
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn active(&self) -> Field {
        self.active
    }

    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }

    pub fn next_field(&mut self) {
        let index = FIELD_ORDER.iter().position(|f| *f == self.active).unwrap_or(0);
        self.active = FIELD_ORDER[(index + 1) % FIELD_ORDER.len()];
    }

    pub fn previous_field(&mut self) {
        let index = FIELD_ORDER.iter().position(|f| *f == self.active).unwrap_or(0);
        self.active = FIELD_ORDER[(index + FIELD_ORDER.len() - 1) % FIELD_ORDER.len()];
    }

    pub fn cycle_status(&mut self, forward: bool) {
        self.status = if forward { self.status.next() } else { self.status.previous() };
    }

    pub fn input(&mut self, c: char) {
        if self.saving {
            return;
        }
        let (text, max) = match self.active {
            Field::Title => (&mut self.title, TITLE_MAX),
            Field::Description => (&mut self.description, DESCRIPTION_MAX),
            Field::Priority => (&mut self.priority, PRIORITY_INPUT_MAX),
            Field::DueDate => (&mut self.due_date, DUE_DATE_INPUT_MAX),
            Field::Status => {
                if c == ' ' {
                    self.cycle_status(true);
                }
                return;
            }
        };
        if text.chars().count() < max {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.saving {
            return;
        }
        match self.active {
            Field::Title => self.title.pop(),
            Field::Description => self.description.pop(),
            Field::Priority => self.priority.pop(),
            Field::DueDate => self.due_date.pop(),
            Field::Status => None,
        };
    }

    pub fn title_counter(&self) -> String {
        format!("{}/{}", self.title.chars().count(), TITLE_MAX)
    }

    pub fn description_counter(&self) -> String {
        format!("{}/{}", self.description.chars().count(), DESCRIPTION_MAX)
    }

    /// Checks every field and records the messages shown under each one.
    pub fn validate(&mut self) -> bool {
        self.errors = self.check().err().unwrap_or_default();
        self.errors.is_empty()
    }

    /// The request to send, or `None` after recording field errors.
    pub fn submission(&mut self) -> Option<Submission> {
        match self.check() {
            Ok(submission) => {
                self.errors.clear();
                Some(submission)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    fn check(&self) -> Result<Submission, Vec<FieldError>> {
        let mut errors = Vec::new();
        let priority = parse_priority(&self.priority).unwrap_or_else(|message| {
            errors.push(FieldError { field: Field::Priority, message });
            Patch::Missing
        });
        let due_date = parse_due_date(&self.due_date).unwrap_or_else(|message| {
            errors.push(FieldError { field: Field::DueDate, message });
            Patch::Missing
        });

        let title = Some(self.title.trim().to_string());
        let description = Some(self.description.trim().to_string());
        let status = Some(self.status.as_str().to_string());

        let (submission, rules) = match self.mode {
            FormMode::Create => {
                let request = CreateTaskRequest { title, description, status, priority, due_date };
                let rules = validation::validate_create(&request).map(|_| ());
                (Submission::Create(request), rules)
            }
            FormMode::Edit(id) => {
                let request = UpdateTaskRequest { title, description, status, priority, due_date };
                let rules = validation::validate_update(&request).map(|_| ());
                (Submission::Update(id, request), rules)
            }
        };
        if let Err(failed) = rules {
            errors.extend(failed.errors);
        }
        if errors.is_empty() {
            Ok(submission)
        } else {
            errors.sort_by_key(|e| FIELD_ORDER.iter().position(|f| *f == e.field));
            Err(errors)
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(64, 22, area);
        let mut lines = Vec::new();

        self.field_lines(&mut lines, Field::Title, "Title", text_with_cursor(&self.title, self.active == Field::Title), Some(self.title_counter()));
        self.field_lines(
            &mut lines,
            Field::Description,
            "Description",
            text_with_cursor(&self.description, self.active == Field::Description),
            Some(self.description_counter()),
        );

        let marker = if self.active == Field::Status { "< >" } else { "" };
        lines.push(label_line("Status", self.active == Field::Status, None));
        lines.push(Line::from(vec![status_chip(self.status), Span::raw(" "), Span::styled(marker, Style::default().fg(Color::DarkGray))]));
        lines.push(Line::default());

        self.field_lines(&mut lines, Field::Priority, "Priority (1-9, optional)", text_with_cursor(&self.priority, self.active == Field::Priority), None);
        self.field_lines(&mut lines, Field::DueDate, "Due date (YYYY-MM-DD, optional)", text_with_cursor(&self.due_date, self.active == Field::DueDate), None);

        let footer = if self.saving {
            Span::styled("Saving...", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled("[Tab] Next field  [Enter] Save  [Esc] Cancel", Style::default().fg(Color::DarkGray))
        };
        lines.push(Line::from(footer));

        let title = match self.mode {
            FormMode::Create => "Create a new task",
            FormMode::Edit(_) => "Edit task",
        };
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(title),
            ),
            popup,
        );
    }

    fn field_lines(&self, lines: &mut Vec<Line<'static>>, field: Field, label: &str, value: String, counter: Option<String>) {
        lines.push(label_line(label, self.active == field, counter));
        lines.push(Line::from(value));
        match self.error_for(field) {
            Some(message) => lines.push(Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red)))),
            None => lines.push(Line::default()),
        }
    }
}

fn label_line(label: &str, active: bool, counter: Option<String>) -> Line<'static> {
    let style = if active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let mut spans = vec![Span::styled(label.to_string(), style)];
    if let Some(counter) = counter {
        spans.push(Span::styled(format!("  {counter}"), Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

fn text_with_cursor(text: &str, active: bool) -> String {
    if active { format!("{text}_") } else { text.to_string() }
}

/// Empty input clears the priority.
fn parse_priority(input: &str) -> Result<Patch<Number>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Patch::Null);
    }
    input
        .parse::<i64>()
        .map(|value| Patch::Value(Number::from(value)))
        .map_err(|_| validation::PRIORITY_NOT_INTEGER.to_string())
}

/// Empty input clears the due date.
fn parse_due_date(input: &str) -> Result<Patch<Number>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Patch::Null);
    }
    DueDate::from_date_input(input)
        .map(|due| Patch::Value(Number::from(due.unix_seconds())))
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::{self, NewTask, Priority};

    fn type_text(form: &mut TaskForm, text: &str) {
        text.chars().for_each(|c| form.input(c));
    }

    #[test]
    fn create_submission_trims_and_nulls_empty_optionals() {
        let mut form = TaskForm::create();
        type_text(&mut form, "  Write report  ");
        let Some(Submission::Create(request)) = form.submission() else { panic!("expected a create submission") };
        assert_eq!(request.title.as_deref(), Some("Write report"));
        assert_eq!(request.description.as_deref(), Some(""));
        assert_eq!(request.status.as_deref(), Some("todo"));
        assert_eq!(request.priority, Patch::Null);
        assert_eq!(request.due_date, Patch::Null);
    }

    #[test]
    fn blank_title_is_reported_on_the_field() {
        let mut form = TaskForm::create();
        type_text(&mut form, "   ");
        assert!(form.submission().is_none());
        assert_eq!(form.error_for(Field::Title), Some(validation::TITLE_REQUIRED));
    }

    #[test]
    fn priority_and_due_date_errors() {
        let mut form = TaskForm::create();
        type_text(&mut form, "Task");
        form.active = Field::Priority;
        type_text(&mut form, "12");
        form.active = Field::DueDate;
        type_text(&mut form, "2026-02-31");

        assert!(!form.validate());
        assert_eq!(form.error_for(Field::Priority), Some("Priority must be between 1 and 9"));
        assert_eq!(form.error_for(Field::DueDate), Some("Invalid calendar date"));

        form.priority = "x".into();
        assert!(!form.validate());
        assert_eq!(form.error_for(Field::Priority), Some(validation::PRIORITY_NOT_INTEGER));
    }

    #[test]
    fn edit_prefills_and_submits_update() {
        let task = Task::new(
            TaskId::new(),
            NewTask {
                title: "Ship".into(),
                description: "v1".into(),
                status: TaskStatus::InProgress,
                priority: Some(Priority::try_from(2).unwrap()),
                due_date: Some(DueDate::from_date_input("2026-01-22").unwrap()),
            },
            task::now(),
        );
        let mut form = TaskForm::edit(&task);
        assert_eq!(form.priority, "2");
        assert_eq!(form.due_date, "2026-01-22");

        form.priority.clear();
        let Some(Submission::Update(id, request)) = form.submission() else { panic!("expected an update submission") };
        assert_eq!(id, task.id);
        assert_eq!(request.status.as_deref(), Some("in-progress"));
        assert_eq!(request.priority, Patch::Null);
        assert_eq!(request.due_date, Patch::Value(Number::from(1_769_040_000_i64)));
    }

    #[test]
    fn title_input_stops_at_limit() {
        let mut form = TaskForm::create();
        type_text(&mut form, &"a".repeat(TITLE_MAX + 5));
        assert_eq!(form.title_counter(), "200/200");
        assert_eq!(form.description_counter(), "0/2000");
    }

    #[test]
    fn field_navigation_wraps() {
        let mut form = TaskForm::create();
        form.previous_field();
        assert_eq!(form.active(), Field::DueDate);
        form.next_field();
        form.next_field();
        assert_eq!(form.active(), Field::Description);
    }
}
