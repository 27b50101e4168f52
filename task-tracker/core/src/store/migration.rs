use super::{
    DEFAULT_USERNAME, LEGACY_GLOBAL_KEY, LEGACY_USER_KEY_PREFIX, USERS_KEY, UserTasks,
    remembered_username,
};
use crate::storage::Storage;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Moves tasks stored in legacy layouts into the users blob.
///
/// Two layouts are recognised:
/// - `tasks_<username>` keys, each holding that user's task sequence
/// - a global `tasks` key holding one sequence, owned by the remembered
///   username or `"default"`
///
/// The global key is staged after the per-user keys, so it wins when both name
/// the same user. Any JSON array is staged as it is; its records are read
/// leniently when the user's tasks are loaded. If anything was staged, the
/// staged map replaces the blob and the consumed legacy keys are deleted.
/// Values that are not arrays are skipped and left in place. When nothing is staged no write
/// happens, which makes repeated calls no-ops.
///
/// Returns the number of users written to the blob.
#[tracing::instrument(skip(storage))]
pub fn migrate_legacy<S: Storage + ?Sized>(storage: &mut S) -> usize {
    let keys = match storage.keys() {
        Ok(keys) => keys,
        Err(err) => {
            warn!("Cannot list storage keys, skipping migration: {}", err);
            return 0;
        }
    };

    let mut staged = UserTasks::new();
    let mut consumed = Vec::new();
    for key in &keys {
        let Some(username) = key.strip_prefix(LEGACY_USER_KEY_PREFIX) else {
            continue;
        };
        if let Some(tasks) = read_legacy_tasks(&*storage, key) {
            staged.insert(username.to_string(), tasks);
            consumed.push(key.as_str());
        }
    }

    let has_global = keys.iter().any(|key| key == LEGACY_GLOBAL_KEY);
    if has_global {
        if let Some(tasks) = read_legacy_tasks(&*storage, LEGACY_GLOBAL_KEY) {
            let owner =
                remembered_username(&*storage).unwrap_or_else(|| DEFAULT_USERNAME.to_string());
            staged.insert(owner, tasks);
        }
    }

    if staged.is_empty() {
        return 0;
    }

    let raw = match serde_json::to_string(&staged) {
        Ok(raw) => raw,
        Err(err) => {
            error!("Failed to serialize migrated tasks: {}", err);
            return 0;
        }
    };
    if let Err(err) = storage.set(USERS_KEY, &raw) {
        error!("Failed to write migrated tasks, keeping legacy keys: {}", err);
        return 0;
    }

    if has_global {
        consumed.push(LEGACY_GLOBAL_KEY);
    }
    for key in consumed {
        if let Err(err) = storage.remove(key) {
            warn!("Failed to remove legacy key {}: {}", key, err);
        }
    }

    info!("Migrated legacy tasks for {} users", staged.len());
    staged.len()
}

fn read_legacy_tasks<S: Storage + ?Sized>(storage: &S, key: &str) -> Option<Value> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            debug!("Cannot read legacy key {}: {}", key, err);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(tasks @ Value::Array(_)) => Some(tasks),
        Ok(_) => {
            debug!("Legacy key {} is not a sequence", key);
            None
        }
        Err(err) => {
            debug!("Legacy key {} is not JSON: {}", key, err);
            None
        }
    }
}
