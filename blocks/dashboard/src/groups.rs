use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use taskpad_atoms::tasks::Task;

use crate::due::parse_due;

/// Time buckets for the dashboard, relative to "now"'s calendar day.
/// Each task lands in at most one bucket; buckets keep the input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskGroups {
    pub today: Vec<Task>,
    pub tomorrow: Vec<Task>,
    pub this_week: Vec<Task>,
    pub later: Vec<Task>,
}

impl TaskGroups {
    pub fn is_empty(&self) -> bool {
        self.today.is_empty()
            && self.tomorrow.is_empty()
            && self.this_week.is_empty()
            && self.later.is_empty()
    }
}

/// Partition a filtered, sorted snapshot into display buckets by calendar
/// day: today, tomorrow, the rest of the next seven days, and later.
///
/// Tasks due strictly before today satisfy none of the predicates and land
/// in no bucket, matching the app's observed behavior; they still appear in
/// the flat filtered list and carry the Overdue label on their card. The
/// same applies to tasks whose due date fails to parse.
pub fn group_by_due(tasks: &[Task], now: DateTime<Utc>) -> TaskGroups {
    let today = now.date_naive();
    let tomorrow = today + Duration::days(1);
    let week_end = today + Duration::days(7);

    let mut groups = TaskGroups::default();
    for task in tasks {
        let Some(due) = parse_due(&task.due_date) else {
            continue;
        };
        let due_day = due.date_naive();

        if due_day == today {
            groups.today.push(task.clone());
        } else if due_day == tomorrow {
            groups.tomorrow.push(task.clone());
        } else if due_day > tomorrow && due_day <= week_end {
            groups.this_week.push(task.clone());
        } else if due_day > week_end {
            groups.later.push(task.clone());
        }
        // strictly before today: overdue, no bucket
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::due::{due_label, DueLabel};
    use crate::filter::{filter_tasks, TaskFilter};
    use chrono::TimeZone;
    use taskpad_atoms::tasks::Priority;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 22, 30, 0).unwrap()
    }

    fn task(id: &str, due: &str) -> Task {
        Task {
            task_id: id.to_string(),
            user_id: "u1".to_string(),
            title: format!("task {id}"),
            description: String::new(),
            due_date: due.to_string(),
            priority: Priority::Low,
            completed: false,
            created_at: "2025-06-01T00:00:00Z".to_string(),
            updated_at: "2025-06-01T00:00:00Z".to_string(),
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.task_id.as_str()).collect()
    }

    #[test]
    fn buckets_today_tomorrow_and_later() {
        // due today, tomorrow, and in 10 days; nothing in between
        let tasks = vec![
            task("t1", "2025-06-15T09:00:00Z"),
            task("t2", "2025-06-16T09:00:00Z"),
            task("t3", "2025-06-25T09:00:00Z"),
        ];
        let groups = group_by_due(&tasks, now());
        assert_eq!(ids(&groups.today), ["t1"]);
        assert_eq!(ids(&groups.tomorrow), ["t2"]);
        assert!(groups.this_week.is_empty());
        assert_eq!(ids(&groups.later), ["t3"]);
    }

    #[test]
    fn this_week_boundaries() {
        let tasks = vec![
            task("day2", "2025-06-17T09:00:00Z"), // day after tomorrow
            task("day7", "2025-06-22T09:00:00Z"), // exactly now + 7 days
            task("day8", "2025-06-23T09:00:00Z"), // one past the window
        ];
        let groups = group_by_due(&tasks, now());
        assert_eq!(ids(&groups.this_week), ["day2", "day7"]);
        assert_eq!(ids(&groups.later), ["day8"]);
    }

    #[test]
    fn overdue_tasks_land_in_no_bucket_but_keep_their_label() {
        let tasks = vec![
            task("old", "2025-06-14T09:00:00Z"), // yesterday
            task("new", "2025-06-15T09:00:00Z"),
        ];

        // the overdue task still shows in the flat filtered list, first
        let filtered = filter_tasks(&tasks, &TaskFilter::default());
        assert_eq!(ids(&filtered), ["old", "new"]);

        // but it appears in none of the four groups
        let groups = group_by_due(&filtered, now());
        assert_eq!(ids(&groups.today), ["new"]);
        assert!(groups.tomorrow.is_empty());
        assert!(groups.this_week.is_empty());
        assert!(groups.later.is_empty());

        // and its card labels Overdue
        assert_eq!(due_label("2025-06-14T09:00:00Z", now()), DueLabel::Overdue);
    }

    #[test]
    fn unparseable_due_dates_land_in_no_bucket() {
        let groups = group_by_due(&[task("bad", "someday")], now());
        assert!(groups.is_empty());
    }

    #[test]
    fn partitions_are_disjoint() {
        let tasks: Vec<Task> = (14..25)
            .map(|day| task(&format!("t{day}"), &format!("2025-06-{day:02}T09:00:00Z")))
            .collect();
        let groups = group_by_due(&tasks, now());

        let mut seen = std::collections::HashSet::new();
        for bucket in [
            &groups.today,
            &groups.tomorrow,
            &groups.this_week,
            &groups.later,
        ] {
            for t in bucket.iter() {
                assert!(seen.insert(t.task_id.clone()), "{} bucketed twice", t.task_id);
            }
        }
        // everything except the one overdue task (June 14) is bucketed
        assert_eq!(seen.len(), tasks.len() - 1);
    }

    #[test]
    fn groups_preserve_input_order() {
        let tasks = vec![
            task("w1", "2025-06-18T09:00:00Z"),
            task("w2", "2025-06-17T09:00:00Z"),
            task("w3", "2025-06-19T09:00:00Z"),
        ];
        let groups = group_by_due(&tasks, now());
        assert_eq!(ids(&groups.this_week), ["w1", "w2", "w3"]);
    }

    #[test]
    fn is_empty_reflects_all_buckets() {
        assert!(TaskGroups::default().is_empty());
        let groups = group_by_due(&[task("t1", "2025-06-15T09:00:00Z")], now());
        assert!(!groups.is_empty());
    }
}
