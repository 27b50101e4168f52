//! Status filtering and free-text search over a task list.

use crate::task::Task;
use crate::validation::ParseError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which completion states are shown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => task.is_completed(),
            StatusFilter::Pending => !task.is_completed(),
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StatusFilter::All => "All",
            StatusFilter::Completed => "Completed",
            StatusFilter::Pending => "Pending",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for StatusFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            _ => Err(ParseError::UnknownStatusFilter(s.to_string())),
        }
    }
}

/// Returns the tasks that pass both the status filter and the search term, in input order.
///
/// The search term is matched case-insensitively as a substring of the title,
/// the description or any tag. An empty term matches everything.
pub fn visible_tasks<'a>(
    tasks: &'a [Task],
    filter: StatusFilter,
    search_term: &str,
) -> Vec<&'a Task> {
    let needle = search_term.to_lowercase();
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .filter(|task| needle.is_empty() || matches_search(task, &needle))
        .collect()
}

/// `needle` must already be lowercase.
fn matches_search(task: &Task, needle: &str) -> bool {
    task.title().to_lowercase().contains(needle)
        || task.description().to_lowercase().contains(needle)
        || task
            .tags()
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Number of tasks behind each filter tab.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub completed: usize,
    pub pending: usize,
}

impl StatusCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.is_completed()).count();
        Self {
            all: tasks.len(),
            completed,
            pending: tasks.len() - completed,
        }
    }
}
