use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Status of a task. Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// Due-date bucket filter for task listing. Buckets are computed against
/// the start of the current UTC day and never overlap between `Overdue`
/// and `Today`; `Upcoming` is everything from today onward.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DueFilter {
    Overdue,
    Today,
    Upcoming,
}

/// Parses a due date from either an RFC 3339 timestamp or a plain
/// `YYYY-MM-DD` date. Plain dates are normalized to midnight UTC.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(format!("Invalid due date format: {}", raw))
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(raw) => parse_due_date(&raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Input for creating a task. The owner and timestamps are never part of
/// the input; they are set server-side.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be present and at most 100 characters.
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub title: String,

    /// At most 500 characters if provided.
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,

    /// Defaults to `pending` when omitted.
    pub status: Option<TaskStatus>,

    /// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update for a task. Absent fields are left untouched; supplied
/// fields are re-validated against the same constraints as creation.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
}

/// A task as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    /// Owner of the task. Set at creation from the authenticated identity;
    /// no code path mutates it afterwards.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for listing tasks. Filters compose conjunctively;
/// search matches title or description case-insensitively.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    /// 1-indexed page number, defaults to 1.
    pub page: Option<i64>,
    /// Page size, defaults to 10, clamped to 1..=100.
    pub limit: Option<i64>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DueFilter>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_plain_date_normalizes_to_midnight_utc() {
        let parsed = parse_due_date("2030-01-01").unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.minute(), 0);
        assert_eq!(parsed.to_rfc3339(), "2030-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rfc3339_keeps_instant() {
        let parsed = parse_due_date("2030-06-15T12:30:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2030-06-15T10:30:00+00:00");
    }

    #[test]
    fn test_parse_garbage_date_fails() {
        assert!(parse_due_date("not-a-date").is_err());
        assert!(parse_due_date("2030-13-45").is_err());
    }

    #[test]
    fn test_task_input_accepts_plain_date() {
        let input: TaskInput = serde_json::from_value(serde_json::json!({
            "title": "Buy milk",
            "status": "pending",
            "due_date": "2030-01-01"
        }))
        .unwrap();
        assert_eq!(input.status, Some(TaskStatus::Pending));
        assert!(input.due_date.is_some());
    }

    #[test]
    fn test_task_input_rejects_bad_due_date() {
        let result: Result<TaskInput, _> = serde_json::from_value(serde_json::json!({
            "title": "Buy milk",
            "due_date": "soon"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_task_input_rejects_unknown_status() {
        let result: Result<TaskInput, _> = serde_json::from_value(serde_json::json!({
            "title": "Buy milk",
            "status": "paused"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_task_input_validation_collects_all_violations() {
        let input = TaskInput {
            title: "".to_string(),
            description: Some("d".repeat(501)),
            status: None,
            due_date: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_task_input_title_bounds() {
        let too_long = TaskInput {
            title: "a".repeat(101),
            description: None,
            status: None,
            due_date: None,
        };
        assert!(too_long.validate().is_err());

        let at_limit = TaskInput {
            title: "a".repeat(100),
            description: Some("d".repeat(500)),
            status: Some(TaskStatus::InProgress),
            due_date: None,
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_task_update_validates_only_supplied_fields() {
        let empty = TaskUpdate::default();
        assert!(empty.validate().is_ok());

        let bad_title = TaskUpdate {
            title: Some("".to_string()),
            ..TaskUpdate::default()
        };
        assert!(bad_title.validate().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            serde_json::json!("in_progress")
        );
    }

    #[test]
    fn test_due_filter_parses_from_query_values() {
        let query: TaskQuery =
            serde_json::from_value(serde_json::json!({ "due_date": "overdue" })).unwrap();
        assert_eq!(query.due_date, Some(DueFilter::Overdue));
    }
}
