//! The task record and its persisted shape.

use crate::validation::{ParseError, TaskDraft};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Identifier of a task, unique within one user's collection.
///
/// Derived from the creation time in milliseconds since the Unix epoch.
pub type TaskId = i64;

/// How urgent a task is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParseError::UnknownPriority(s.to_string())),
        }
    }
}

/// A single user-created unit of work.
///
/// Tasks are only created through [`crate::TaskList::add`] or by reading persisted
/// data, so tags never contain empty entries.
///
/// Reading is lenient: `null` or missing fields fall back to their defaults, an
/// unknown priority reads as [`Priority::Medium`], and a missing or unreadable
/// `createdAt` is derived from the id, which is the creation time in
/// milliseconds. Only `id` and `title` are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredTask")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    completed: bool,
    #[serde(serialize_with = "created_at_format::serialize")]
    created_at: DateTime<Utc>,
    priority: Priority,
    due_date: Option<String>,
    tags: Vec<String>,
}

/// A task as found in storage, before defaults are filled in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: TaskId,
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    completed: bool,
    #[serde(default, deserialize_with = "created_at_format::deserialize")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_priority")]
    priority: Priority,
    #[serde(default, deserialize_with = "blank_as_none")]
    due_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<String>,
}

impl From<StoredTask> for Task {
    fn from(stored: StoredTask) -> Self {
        let created_at = stored
            .created_at
            .or_else(|| DateTime::<Utc>::from_timestamp_millis(stored.id))
            .unwrap_or_default();
        Task {
            id: stored.id,
            title: stored.title,
            description: stored.description,
            completed: stored.completed,
            created_at,
            priority: stored.priority,
            due_date: stored.due_date,
            tags: stored.tags.into_iter().filter(|tag| !tag.is_empty()).collect(),
        }
    }
}

impl Task {
    pub(crate) fn from_draft(id: TaskId, created_at: DateTime<Utc>, draft: TaskDraft) -> Self {
        let mut task = Task {
            id,
            title: String::new(),
            description: String::new(),
            completed: false,
            created_at,
            priority: Priority::default(),
            due_date: None,
            tags: Vec::new(),
        };
        task.apply(draft);
        task
    }

    /// Overwrites every user-editable field; `id`, `completed` and `created_at` are kept.
    pub(crate) fn apply(&mut self, draft: TaskDraft) {
        let (title, description, priority, due_date, tags) = draft.into_parts();
        self.title = title;
        self.description = description;
        self.priority = priority;
        self.due_date = due_date;
        self.tags = tags;
    }

    pub(crate) fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due_date(&self) -> Option<&str> {
        self.due_date.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|name| name.parse().ok()).unwrap_or_default())
}

/// Date pickers hand over an empty string when no date is chosen.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}

/// `createdAt` is written as `YYYY-MM-DDTHH:MM:SS.mmmZ` so it sorts lexically.
pub(crate) mod created_at_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn serialize<S>(created_at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&created_at.format(FORMAT))
    }

    /// Reads any RFC 3339 timestamp; anything else is treated as absent.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|created_at| created_at.with_timezone(&Utc)))
    }
}
