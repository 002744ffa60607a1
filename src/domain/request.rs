//! Request and response bodies shared by the server routes and the client.
//!
//! Fields are loosely typed on purpose: a wrong status string or a fractional
//! priority must reach [`crate::domain::validation`] and come back as a field
//! message rather than a deserialization failure.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::patch::Patch;
use super::task::{TaskId, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub priority: Patch<Number>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub due_date: Patch<Number>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub priority: Patch<Number>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub due_date: Patch<Number>,
}

impl UpdateTaskRequest {
    pub fn status(status: TaskStatus) -> Self {
        Self { status: Some(status.as_str().to_string()), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: TaskId,
}
