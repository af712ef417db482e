use serde::{Deserialize, Serialize};

/// Task priority as it appears on the wire ("low" | "medium" | "high")
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Task domain model - a single to-do item owned by exactly one user
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "id")]
    pub task_id: String,

    /// Owner identifier (identity provider sub); immutable after creation
    pub user_id: String,

    pub title: String,
    pub description: String,

    /// ISO-8601 due date; parsed on demand by the dashboard
    pub due_date: String,

    pub priority: Priority,
    pub completed: bool,

    pub created_at: String,

    /// Refreshed on every mutation
    pub updated_at: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}
