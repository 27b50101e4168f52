use crate::task::{Task, TaskId};
use crate::validation::TaskDraft;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// One user's tasks in display order.
///
/// This is the in-memory working copy; nothing here touches storage. Callers
/// hand the list back to [`crate::TaskStore::save_all`] after a change.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new pending task created now and returns its id.
    pub fn add(&mut self, draft: TaskDraft) -> TaskId {
        self.add_at(draft, Utc::now())
    }

    /// Appends a new pending task with the given creation time.
    ///
    /// The time is truncated to milliseconds, the precision it is persisted with.
    pub fn add_at(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> TaskId {
        let created_at = now.trunc_subsecs(3);
        let id = self.next_id(created_at.timestamp_millis());
        self.tasks.push(Task::from_draft(id, created_at, draft));
        id
    }

    /// Replaces title, description, priority, due date and tags of a task.
    ///
    /// Returns `false` and changes nothing if no task has this id.
    pub fn edit(&mut self, id: TaskId, draft: TaskDraft) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.apply(draft);
                true
            }
            None => false,
        }
    }

    /// Removes a task. Returns `false` if no task has this id.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id() != id);
        self.tasks.len() != before
    }

    /// Flips the completion flag of a task. Returns `false` if no task has this id.
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.toggle();
                true
            }
            None => false,
        }
    }

    pub fn find_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    /// Uses the clock value unless an existing id has already reached it.
    /// Past the largest representable id, the first free id from the clock on is used.
    fn next_id(&self, clock_millis: TaskId) -> TaskId {
        let max = match self.tasks.iter().map(Task::id).max() {
            Some(max) if max >= clock_millis => max,
            _ => return clock_millis,
        };
        match max.checked_add(1) {
            Some(id) => id,
            None => (clock_millis..TaskId::MAX)
                .find(|id| self.find_by_id(*id).is_none())
                .unwrap_or(clock_millis),
        }
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl From<TaskList> for Vec<Task> {
    fn from(list: TaskList) -> Self {
        list.tasks
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::TimeZone;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title).unwrap()
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_add_task() {
        // Arrange
        let mut list = TaskList::new();
        let now = at(1_700_000_000_123);

        // Act
        let id = list.add_at(
            draft("Test task")
                .with_description("Details")
                .with_priority(Priority::Low)
                .with_due_date(Some("2025-02-01"))
                .with_tags("work, home"),
            now,
        );

        // Assert
        assert_eq!(id, 1_700_000_000_123);
        assert_eq!(list.len(), 1);
        let task = list.find_by_id(id).unwrap();
        assert_eq!(task.title(), "Test task");
        assert_eq!(task.description(), "Details");
        assert!(!task.is_completed());
        assert_eq!(task.created_at(), now);
        assert_eq!(task.priority(), Priority::Low);
        assert_eq!(task.due_date(), Some("2025-02-01"));
        assert_eq!(task.tags(), ["work".to_string(), "home".to_string()]);
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut list = TaskList::new();

        list.add(draft("Task 1"));
        list.add(draft("Task 2"));
        list.add(draft("Task 3"));

        let titles: Vec<&str> = list.iter().map(Task::title).collect();
        assert_eq!(titles, vec!["Task 1", "Task 2", "Task 3"]);
    }

    #[test]
    fn test_ids_stay_unique_within_the_same_millisecond() {
        // Arrange
        let mut list = TaskList::new();
        let now = at(1_000);

        // Act
        let first = list.add_at(draft("A"), now);
        let second = list.add_at(draft("B"), now);
        let third = list.add_at(draft("C"), at(500));

        // Assert
        assert_eq!(first, 1_000);
        assert_eq!(second, 1_001);
        assert_eq!(third, 1_002);
    }

    #[test]
    fn test_largest_stored_id_does_not_overflow() {
        // Arrange
        let stored = format!(r#"[{{"id":{},"title":"Last"}}]"#, TaskId::MAX);
        let mut list: TaskList = serde_json::from_str(&stored).unwrap();

        // Act
        let id = list.add_at(draft("Next"), at(1_000));

        // Assert
        assert_eq!(id, 1_000);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_created_at_is_truncated_to_milliseconds() {
        let mut list = TaskList::new();
        let now = Utc.timestamp_nanos(1_700_000_000_123_456_789);

        let id = list.add_at(draft("A"), now);

        assert_eq!(
            list.find_by_id(id).unwrap().created_at(),
            at(1_700_000_000_123)
        );
    }

    #[test]
    fn test_add_then_delete_restores_original() {
        // Arrange
        let mut list = TaskList::new();
        list.add_at(draft("Existing 1"), at(1));
        list.add_at(draft("Existing 2"), at(2));
        let original = list.clone();

        // Act
        let id = list.add(draft("Temporary"));
        let removed = list.delete(id);

        // Assert
        assert!(removed);
        assert_eq!(list, original);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut list = TaskList::new();
        list.add_at(draft("Keep"), at(1));
        let original = list.clone();

        assert!(!list.delete(42));
        assert_eq!(list, original);
    }

    #[test]
    fn test_delete_preserves_order_of_others() {
        let mut list = TaskList::new();
        list.add_at(draft("A"), at(1));
        let b = list.add_at(draft("B"), at(2));
        list.add_at(draft("C"), at(3));

        list.delete(b);

        let titles: Vec<&str> = list.iter().map(Task::title).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn test_toggle_twice_restores_original() {
        // Arrange
        let mut list = TaskList::new();
        let id = list.add_at(draft("A"), at(1));
        list.add_at(draft("B"), at(2));
        let original = list.clone();

        // Act
        assert!(list.toggle_complete(id));
        assert!(list.find_by_id(id).unwrap().is_completed());
        assert!(list.toggle_complete(id));

        // Assert
        assert_eq!(list, original);
    }

    #[test]
    fn test_toggle_missing_id_is_noop() {
        let mut list = TaskList::new();
        list.add_at(draft("A"), at(1));
        let original = list.clone();

        assert!(!list.toggle_complete(7));
        assert_eq!(list, original);
    }

    #[test]
    fn test_edit_replaces_fields_but_keeps_identity_and_status() {
        // Arrange
        let mut list = TaskList::new();
        let created = at(1_000);
        let id = list.add_at(
            draft("Old")
                .with_description("old description")
                .with_priority(Priority::High)
                .with_due_date(Some("2025-01-01"))
                .with_tags("a, b"),
            created,
        );
        list.toggle_complete(id);

        // Act
        let edited = list.edit(id, draft("New").with_tags("c"));

        // Assert
        assert!(edited);
        let task = list.find_by_id(id).unwrap();
        assert_eq!(task.id(), id);
        assert_eq!(task.title(), "New");
        assert_eq!(task.description(), "");
        assert_eq!(task.priority(), Priority::Medium);
        assert_eq!(task.due_date(), None);
        assert_eq!(task.tags(), ["c".to_string()]);
        assert!(task.is_completed());
        assert_eq!(task.created_at(), created);
    }

    #[test]
    fn test_edit_missing_id_is_noop() {
        let mut list = TaskList::new();
        list.add_at(draft("A"), at(1));
        let original = list.clone();

        assert!(!list.edit(99, draft("B")));
        assert_eq!(list, original);
    }

    #[test]
    fn test_serializes_as_plain_sequence() {
        let mut list = TaskList::new();
        list.add_at(draft("A"), at(1));

        let value = serde_json::to_value(&list).unwrap();

        assert!(value.is_array());
        assert_eq!(value[0]["title"], "A");
        assert_eq!(value[0]["createdAt"], "1970-01-01T00:00:00.001Z");
    }
}
