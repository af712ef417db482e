//! Dashboard logic over a task snapshot: free-text/predicate filtering,
//! due-date time buckets, and per-card due labels. Everything here is pure
//! and deterministic; "now" is always an explicit argument.

pub mod due;
pub mod filter;
pub mod groups;

pub use due::{due_label, parse_due, priority_color, DueLabel};
pub use filter::{filter_tasks, StatusFilter, TaskFilter};
pub use groups::{group_by_due, TaskGroups};
