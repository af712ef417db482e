use serde::{Deserialize, Serialize};

/// Change notification for a user's task collection.
///
/// Events are hints, not diffs: a consumer reacts by reloading a full
/// snapshot of the owner's partition and replacing its local copy wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TaskChange {
    TaskCreated { user_id: String, task_id: String },
    TaskUpdated { user_id: String, task_id: String },
    TaskDeleted { user_id: String, task_id: String },
}

impl TaskChange {
    /// Owner whose collection this event touches
    pub fn user_id(&self) -> &str {
        match self {
            TaskChange::TaskCreated { user_id, .. }
            | TaskChange::TaskUpdated { user_id, .. }
            | TaskChange::TaskDeleted { user_id, .. } => user_id,
        }
    }

    pub fn task_id(&self) -> &str {
        match self {
            TaskChange::TaskCreated { task_id, .. }
            | TaskChange::TaskUpdated { task_id, .. }
            | TaskChange::TaskDeleted { task_id, .. } => task_id,
        }
    }
}
