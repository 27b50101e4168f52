//! Core of the task tracker: the task model, per-user persistence and the
//! filter/search used to render a user's list.
//!
//! A session layer supplies the username, loads the list with
//! [`TaskStore::load_all`], changes it through [`TaskList`], renders
//! [`visible_tasks`] and saves the full list back with [`TaskStore::save_all`].
pub mod filter;
pub mod storage;
pub mod store;
pub mod task;
pub mod tasks;
pub mod validation;

pub use filter::{StatusCounts, StatusFilter, visible_tasks};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{StoreError, TaskStore, migrate_legacy, remembered_username};
pub use task::{Priority, Task, TaskId};
pub use tasks::TaskList;
pub use validation::{ParseError, TaskDraft, ValidationError, parse_tags, validate_username};
