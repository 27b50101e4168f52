//! Input checks that run before anything reaches a task collection.
//!
//! Forms and command handlers build a [`TaskDraft`] from raw user input. A draft
//! can only exist with a non-blank title, so the collection operations never
//! have to reject anything themselves.

use crate::task::Priority;
use thiserror::Error;

/// Raw user input that cannot be turned into a task or session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task title is required!")]
    EmptyTitle,
    #[error("Username is required")]
    EmptyUsername,
}

/// A string that does not name a known enum value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown priority '{0}', expected one of: low, medium, high")]
    UnknownPriority(String),
    #[error("Unknown status filter '{0}', expected one of: all, completed, pending")]
    UnknownStatusFilter(String),
}

/// Validated field values for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
    priority: Priority,
    due_date: Option<String>,
    tags: Vec<String>,
}

impl TaskDraft {
    /// Starts a draft from a title, which is trimmed and must not be empty.
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self {
            title: title.to_string(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
            tags: Vec::new(),
        })
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.trim().to_string();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date; `None` or a blank string means no due date.
    pub fn with_due_date(mut self, due_date: Option<&str>) -> Self {
        self.due_date = due_date
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .map(str::to_string);
        self
    }

    /// Sets the tags from a comma-separated string, see [`parse_tags`].
    pub fn with_tags(mut self, raw_tags: &str) -> Self {
        self.tags = parse_tags(raw_tags);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
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

    pub(crate) fn into_parts(self) -> (String, String, Priority, Option<String>, Vec<String>) {
        (
            self.title,
            self.description,
            self.priority,
            self.due_date,
            self.tags,
        )
    }
}

/// Splits a comma-separated tag list.
///
/// Each piece is trimmed and empty pieces are dropped. Order is preserved and
/// duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trims a username and rejects it if nothing is left.
pub fn validate_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    Ok(username.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_trims_title() {
        let draft = TaskDraft::new("  Buy Groceries ").unwrap();
        assert_eq!(draft.title(), "Buy Groceries");
    }

    #[test]
    fn test_draft_rejects_blank_title() {
        assert_eq!(TaskDraft::new(""), Err(ValidationError::EmptyTitle));
        assert_eq!(TaskDraft::new("   \t"), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_draft_defaults() {
        // Act
        let draft = TaskDraft::new("Title").unwrap();

        // Assert
        assert_eq!(draft.description(), "");
        assert_eq!(draft.priority(), Priority::Medium);
        assert_eq!(draft.due_date(), None);
        assert!(draft.tags().is_empty());
    }

    #[test]
    fn test_draft_builder_sets_all_fields() {
        // Act
        let draft = TaskDraft::new("Title")
            .unwrap()
            .with_description("  details  ")
            .with_priority(Priority::High)
            .with_due_date(Some("2025-01-31"))
            .with_tags("work, urgent");

        // Assert
        assert_eq!(draft.description(), "details");
        assert_eq!(draft.priority(), Priority::High);
        assert_eq!(draft.due_date(), Some("2025-01-31"));
        assert_eq!(draft.tags(), ["work".to_string(), "urgent".to_string()]);
    }

    #[test]
    fn test_blank_due_date_is_absent() {
        let draft = TaskDraft::new("Title").unwrap().with_due_date(Some("  "));
        assert_eq!(draft.due_date(), None);
    }

    #[test]
    fn test_parse_tags_trims_and_drops_empty_pieces() {
        assert_eq!(
            parse_tags(" work ,, personal, ,home "),
            vec!["work", "personal", "home"]
        );
    }

    #[test]
    fn test_parse_tags_keeps_order_and_duplicates() {
        assert_eq!(parse_tags("b,a,b"), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_parse_tags_of_empty_string_is_empty() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  alice "), Ok("alice".to_string()));
        assert_eq!(validate_username("Alice"), Ok("Alice".to_string()));
        assert_eq!(validate_username("   "), Err(ValidationError::EmptyUsername));
    }
}
