//! Per-user task persistence.
//!
//! All users' tasks live in one JSON blob under [`USERS_KEY`], a map from
//! username to that user's task sequence:
//!
//! ```json
//! { "alice": [ { "id": 1, "title": "X", ... } ], "bob": [] }
//! ```
//!
//! Each user's entry is kept as raw JSON until that user is asked for, so a
//! record this crate cannot read never affects anyone else's tasks.
//!
//! Every entry point first runs [`migrate_legacy`], which folds older layouts
//! into the blob once and is a no-op afterwards.

mod migration;

pub use migration::migrate_legacy;

use crate::storage::{Storage, StorageError};
use crate::task::Task;
use crate::tasks::TaskList;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Key of the blob holding every user's tasks.
pub const USERS_KEY: &str = "taskTrackerUsers";
/// Key under which the session layer remembers the last logged-in user.
pub const REMEMBERED_USERNAME_KEY: &str = "taskTrackerUsername";
/// Prefix of the legacy one-key-per-user layout, followed by the username.
pub const LEGACY_USER_KEY_PREFIX: &str = "tasks_";
/// Key of the legacy layout holding a single task sequence with no owner.
pub const LEGACY_GLOBAL_KEY: &str = "tasks";
/// Owner of legacy global tasks when no username is remembered.
pub const DEFAULT_USERNAME: &str = "default";

type UserTasks = BTreeMap<String, Value>;

/// Errors returned when the task blob cannot be written.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write tasks to storage")]
    Storage(#[from] StorageError),
    #[error("Failed to serialize tasks")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes each user's task list on an injected storage medium.
pub struct TaskStore<S: Storage> {
    storage: S,
}

impl<S: Storage> TaskStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Returns the tasks of `username`.
    ///
    /// Unknown users, a missing blob and an unreadable blob all yield an empty
    /// list. Records that cannot be read as a task are skipped.
    #[tracing::instrument(skip(self))]
    pub fn load_all(&mut self, username: &str) -> TaskList {
        self.migrate_legacy();
        let tasks = match self.read_users().remove(username) {
            Some(entry) => decode_tasks(entry),
            None => TaskList::new(),
        };
        debug!("Loaded {} tasks", tasks.len());
        tasks
    }

    /// Replaces the stored tasks of `username` with `tasks`.
    ///
    /// Other users' entries are written back exactly as they were read, in a
    /// single write. An unreadable existing blob is treated as empty.
    #[tracing::instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn save_all(&mut self, username: &str, tasks: &TaskList) -> Result<(), StoreError> {
        self.migrate_legacy();
        let mut users = self.read_users();
        users.insert(username.to_string(), serde_json::to_value(tasks)?);
        self.write_users(&users)?;
        debug!("Saved tasks");
        Ok(())
    }

    /// Returns every username that has a task list, sorted.
    #[tracing::instrument(skip(self))]
    pub fn list_users(&mut self) -> Vec<String> {
        self.migrate_legacy();
        self.read_users().into_keys().collect()
    }

    /// Folds legacy layouts into the blob. Returns the number of users migrated.
    pub fn migrate_legacy(&mut self) -> usize {
        migrate_legacy(&mut self.storage)
    }

    fn read_users(&self) -> UserTasks {
        match self.storage.get(USERS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("Stored tasks are unreadable, treating as empty: {}", err);
                UserTasks::new()
            }),
            Ok(None) => UserTasks::new(),
            Err(err) => {
                warn!("Failed to read stored tasks, treating as empty: {}", err);
                UserTasks::new()
            }
        }
    }

    fn write_users(&mut self, users: &UserTasks) -> Result<(), StoreError> {
        let raw = serde_json::to_string(users)?;
        self.storage.set(USERS_KEY, &raw)?;
        Ok(())
    }
}

/// Decodes one user's stored sequence, dropping entries that are not tasks.
fn decode_tasks(entry: Value) -> TaskList {
    let Value::Array(records) = entry else {
        warn!("Stored task list is not a sequence, treating as empty");
        return TaskList::new();
    };
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Task>(record) {
            Ok(task) => Some(task),
            Err(err) => {
                warn!("Skipping unreadable task: {}", err);
                None
            }
        })
        .collect::<Vec<_>>()
        .into()
}

/// Reads the remembered username, treating an empty value as absent.
pub fn remembered_username<S: Storage + ?Sized>(storage: &S) -> Option<String> {
    match storage.get(REMEMBERED_USERNAME_KEY) {
        Ok(username) => username.filter(|name| !name.is_empty()),
        Err(err) => {
            warn!("Failed to read remembered username: {}", err);
            None
        }
    }
}
