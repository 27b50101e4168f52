//! Who is using the tracker.
//!
//! The remembered username lives in the same storage medium as the tasks, under
//! the key the task store falls back to when migrating legacy data.

use anyhow::{Context, bail};
use task_tracker_core::store::REMEMBERED_USERNAME_KEY;
use task_tracker_core::{Storage, remembered_username, validate_username};

/// Remembers `raw_username` (trimmed) as the current user and returns it.
pub fn login<S: Storage>(storage: &mut S, raw_username: &str) -> anyhow::Result<String> {
    let username = validate_username(raw_username)?;
    storage
        .set(REMEMBERED_USERNAME_KEY, &username)
        .context("Failed to remember username")?;
    tracing::info!("Logged in as {}", username);
    Ok(username)
}

/// Forgets the current user. Their tasks stay in storage.
pub fn logout<S: Storage>(storage: &mut S) -> anyhow::Result<Option<String>> {
    let previous = remembered_username(&*storage);
    storage
        .remove(REMEMBERED_USERNAME_KEY)
        .context("Failed to forget username")?;
    Ok(previous)
}

/// Resolves the acting user: an explicit override wins over the remembered one.
pub fn current_user<S: Storage>(storage: &S, user_override: Option<&str>) -> anyhow::Result<String> {
    if let Some(raw) = user_override {
        return Ok(validate_username(raw)?);
    }
    match remembered_username(storage) {
        Some(username) => Ok(username),
        None => bail!("Not logged in. Run `task-cli login <username>` or pass --user <username>"),
    }
}
