//! Field rules for tasks.
//!
//! The service runs these before any store call and the client form runs the
//! same functions for immediate feedback, so the two sides cannot disagree.

use serde_json::Number;

use super::patch::Patch;
use super::request::{CreateTaskRequest, UpdateTaskRequest};
use super::task::{
    DESCRIPTION_MAX, DueDate, NewTask, Priority, TITLE_MAX, TaskChanges, TaskStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Status => "status",
            Field::Priority => "priority",
            Field::DueDate => "dueDate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Task validation failed: {}", joined(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }
}

fn joined(errors: &[FieldError]) -> String {
    errors.iter().map(|e| format!("{}: {}", e.field.as_str(), e.message)).collect::<Vec<_>>().join(", ")
}

pub const TITLE_REQUIRED: &str = "Title is required";
pub const STATUS_INVALID: &str = "Status must be one of: todo, in-progress, done";
pub const PRIORITY_NOT_INTEGER: &str = "Priority must be an integer";
pub const DUE_DATE_INVALID: &str = "Due date must be a date at 00:00:00 UTC";

/// Trims the title and checks it is present and within bounds.
pub fn check_title(raw: &str) -> Result<String, String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(TITLE_REQUIRED.to_string());
    }
    if title.chars().count() > TITLE_MAX {
        return Err(format!("Title cannot exceed {TITLE_MAX} characters"));
    }
    Ok(title.to_string())
}

pub fn check_description(raw: &str) -> Result<String, String> {
    let description = raw.trim();
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(format!("Description cannot exceed {DESCRIPTION_MAX} characters"));
    }
    Ok(description.to_string())
}

pub fn check_status(raw: &str) -> Result<TaskStatus, String> {
    raw.parse().map_err(|_| STATUS_INVALID.to_string())
}

pub fn check_priority(raw: &Number) -> Result<Priority, String> {
    let value = integral(raw).ok_or_else(|| PRIORITY_NOT_INTEGER.to_string())?;
    Priority::try_from(value).map_err(|e| e.to_string())
}

pub fn check_due_date(raw: &Number) -> Result<DueDate, String> {
    let value = integral(raw).ok_or_else(|| DUE_DATE_INVALID.to_string())?;
    DueDate::try_from(value).map_err(|_| DUE_DATE_INVALID.to_string())
}

/// Accepts `3` and `3.0` alike; rejects `3.5` and values outside `i64`.
fn integral(number: &Number) -> Option<i64> {
    if let Some(value) = number.as_i64() {
        return Some(value);
    }
    let value = number.as_f64()?;
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn check<T>(&mut self, field: Field, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.push(FieldError { field, message });
                None
            }
        }
    }

    fn check_patch<T>(
        &mut self,
        field: Field,
        patch: &Patch<Number>,
        rule: impl FnOnce(&Number) -> Result<T, String>,
    ) -> Patch<T> {
        match patch {
            Patch::Missing => Patch::Missing,
            Patch::Null => Patch::Null,
            Patch::Value(raw) => match self.check(field, rule(raw)) {
                Some(value) => Patch::Value(value),
                None => Patch::Missing,
            },
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError { errors: self.errors })
        }
    }
}

pub fn validate_create(request: &CreateTaskRequest) -> Result<NewTask, ValidationError> {
    let mut collector = Collector::default();

    let title = match request.title.as_deref() {
        Some(raw) => collector.check(Field::Title, check_title(raw)),
        None => collector.check::<String>(Field::Title, Err(TITLE_REQUIRED.to_string())),
    };
    let description = match request.description.as_deref() {
        Some(raw) => collector.check(Field::Description, check_description(raw)),
        None => Some(String::new()),
    };
    let status = match request.status.as_deref() {
        Some(raw) => collector.check(Field::Status, check_status(raw)),
        None => Some(TaskStatus::default()),
    };
    let priority = collector.check_patch(Field::Priority, &request.priority, check_priority);
    let due_date = collector.check_patch(Field::DueDate, &request.due_date, check_due_date);

    let task = NewTask {
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        status: status.unwrap_or_default(),
        priority: patch_into_option(priority),
        due_date: patch_into_option(due_date),
    };
    collector.finish(task)
}

pub fn validate_update(request: &UpdateTaskRequest) -> Result<TaskChanges, ValidationError> {
    let mut collector = Collector::default();

    let title = request
        .title
        .as_deref()
        .and_then(|raw| collector.check(Field::Title, check_title(raw)));
    let description = request
        .description
        .as_deref()
        .and_then(|raw| collector.check(Field::Description, check_description(raw)));
    let status = request
        .status
        .as_deref()
        .and_then(|raw| collector.check(Field::Status, check_status(raw)));
    let priority = collector.check_patch(Field::Priority, &request.priority, check_priority);
    let due_date = collector.check_patch(Field::DueDate, &request.due_date, check_due_date);

    collector.finish(TaskChanges { title, description, status, priority, due_date })
}

fn patch_into_option<T>(patch: Patch<T>) -> Option<T> {
    match patch {
        Patch::Value(value) => Some(value),
        Patch::Missing | Patch::Null => None,
    }
}
