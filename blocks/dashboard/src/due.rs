use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use taskpad_atoms::tasks::Priority;

/// Parse a stored due-date string: RFC 3339 first, then the bare date-time
/// and date-only fallbacks. `None` for anything unparseable.
pub fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

/// Per-card due-date label. Mutually exclusive, checked in this order:
/// today beats tomorrow beats overdue, so a task due today is never labeled
/// overdue no matter how late in the day it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DueLabel {
    DueToday,
    DueTomorrow,
    Overdue,
    Scheduled(String),
}

/// Classify one due date against "now" by calendar day.
/// An unparseable date degrades to a plain `Scheduled` label carrying the
/// raw string; a bad field never fails the card.
pub fn due_label(due_date: &str, now: DateTime<Utc>) -> DueLabel {
    let Some(due) = parse_due(due_date) else {
        return DueLabel::Scheduled(due_date.to_string());
    };

    let today = now.date_naive();
    let due_day = due.date_naive();

    if due_day == today {
        DueLabel::DueToday
    } else if due_day == today + Duration::days(1) {
        DueLabel::DueTomorrow
    } else if due_day < today {
        DueLabel::Overdue
    } else {
        DueLabel::Scheduled(due.format("%b %d, %Y").to_string())
    }
}

impl DueLabel {
    /// Chip text
    pub fn text(&self) -> String {
        match self {
            DueLabel::DueToday => "Due Today".to_string(),
            DueLabel::DueTomorrow => "Due Tomorrow".to_string(),
            DueLabel::Overdue => "Overdue".to_string(),
            DueLabel::Scheduled(date) => date.clone(),
        }
    }

    /// Chip color
    pub fn color(&self) -> &'static str {
        match self {
            DueLabel::DueToday => "#DD6B20",
            DueLabel::DueTomorrow => "#D69E2E",
            DueLabel::Overdue => "#E53E3E",
            DueLabel::Scheduled(_) => "#718096",
        }
    }
}

/// Chip color for a priority badge
pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#E53E3E",
        Priority::Medium => "#DD6B20",
        Priority::Low => "#3182CE",
    }
}
