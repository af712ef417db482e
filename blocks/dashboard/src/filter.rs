use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskpad_atoms::tasks::{Priority, Task};

use crate::due::parse_due;

/// Completion predicate for the status segmented control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Completed,
    Incomplete,
}

/// Search plus predicate configuration for the dashboard list.
/// Everything unset matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFilter {
    pub search_term: String,
    pub priority: Option<Priority>,
    pub status: Option<StatusFilter>,
}

/// Filter a snapshot and sort it by due date, earliest first.
///
/// A task is retained iff its title or description contains the search term
/// (case-insensitive; the empty term matches everything), its priority
/// matches the priority filter when one is set, and its completion state
/// matches the status filter when one is set.
///
/// The sort is stable, so equal due dates keep their input order. Tasks
/// whose due date fails to parse sort after every parseable one.
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    let needle = filter.search_term.to_lowercase();

    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|task| {
            let title_match = task.title.to_lowercase().contains(&needle);
            let description_match = task.description.to_lowercase().contains(&needle);
            let priority_match = filter.priority.map_or(true, |p| task.priority == p);
            let status_match = filter.status.map_or(true, |s| match s {
                StatusFilter::Completed => task.completed,
                StatusFilter::Incomplete => !task.completed,
            });
            (title_match || description_match) && priority_match && status_match
        })
        .cloned()
        .collect();

    out.sort_by_key(|task| match parse_due(&task.due_date) {
        Some(due) => (false, due),
        None => (true, DateTime::<Utc>::MAX_UTC),
    });

    out
}
