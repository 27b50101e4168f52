use crate::cli::Commands;
use crate::session;
use chrono::Local;
use std::io::Write;
use task_tracker_core::{
    StatusCounts, Storage, Task, TaskDraft, TaskId, TaskList, TaskStore, visible_tasks,
};

/// Runs one command against `storage`, writing user-facing output to `out`.
///
/// Commands that change tasks load the user's whole list, apply one change and
/// save the whole list back.
pub fn execute<S: Storage, W: Write>(
    command: Commands,
    user_override: Option<&str>,
    mut storage: S,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Login { username } => {
            let username = session::login(&mut storage, &username)?;
            writeln!(out, "Logged in as {}", username)?;
        }
        Commands::Logout => match session::logout(&mut storage)? {
            Some(username) => writeln!(out, "Logged out {}", username)?,
            None => writeln!(out, "Nobody is logged in")?,
        },
        Commands::Whoami => {
            let username = session::current_user(&storage, user_override)?;
            writeln!(out, "{}", username)?;
        }
        Commands::Users => {
            let mut store = TaskStore::new(storage);
            for username in store.list_users() {
                writeln!(out, "{}", username)?;
            }
        }
        Commands::Add {
            title,
            description,
            priority,
            due,
            tags,
        } => {
            let draft = TaskDraft::new(&title)?
                .with_description(&description)
                .with_priority(priority)
                .with_due_date(due.as_deref())
                .with_tags(&tags);
            let mut workspace = Workspace::open(storage, user_override)?;
            let id = workspace.tasks.add(draft);
            workspace.save()?;
            writeln!(out, "Task added with ID {}", id)?;
        }
        Commands::Edit {
            id,
            title,
            description,
            priority,
            due,
            clear_due,
            tags,
        } => {
            let mut workspace = Workspace::open(storage, user_override)?;
            let Some(task) = workspace.tasks.find_by_id(id) else {
                return not_found(out, id);
            };
            let due = if clear_due {
                None
            } else {
                due.or_else(|| task.due_date().map(str::to_string))
            };
            let draft = TaskDraft::new(title.as_deref().unwrap_or(task.title()))?
                .with_description(description.as_deref().unwrap_or(task.description()))
                .with_priority(priority.unwrap_or(task.priority()))
                .with_due_date(due.as_deref())
                .with_tags(&tags.unwrap_or_else(|| task.tags().join(", ")));
            workspace.tasks.edit(id, draft);
            workspace.save()?;
            writeln!(out, "Task {} updated", id)?;
        }
        Commands::Toggle { id } => {
            let mut workspace = Workspace::open(storage, user_override)?;
            if !workspace.tasks.toggle_complete(id) {
                return not_found(out, id);
            }
            workspace.save()?;
            let completed = workspace
                .tasks
                .find_by_id(id)
                .is_some_and(Task::is_completed);
            let status = if completed { "completed" } else { "pending" };
            writeln!(out, "Task {} marked as {}", id, status)?;
        }
        Commands::Delete { id } => {
            let mut workspace = Workspace::open(storage, user_override)?;
            if !workspace.tasks.delete(id) {
                return not_found(out, id);
            }
            workspace.save()?;
            writeln!(out, "Task {} deleted", id)?;
        }
        Commands::List { filter, search } => {
            let workspace = Workspace::open(storage, user_override)?;
            let tasks = workspace.tasks.as_slice();
            let visible = visible_tasks(tasks, filter, &search);
            if visible.is_empty() {
                writeln!(out, "No tasks found")?;
            }
            for task in visible {
                write_task(out, task)?;
            }
            let counts = StatusCounts::of(tasks);
            writeln!(
                out,
                "All: {} | Completed: {} | Pending: {}",
                counts.all, counts.completed, counts.pending
            )?;
        }
    }
    Ok(())
}

/// The acting user's task list together with the store it came from.
struct Workspace<S: Storage> {
    store: TaskStore<S>,
    username: String,
    tasks: TaskList,
}

impl<S: Storage> Workspace<S> {
    fn open(storage: S, user_override: Option<&str>) -> anyhow::Result<Self> {
        let username = session::current_user(&storage, user_override)?;
        let mut store = TaskStore::new(storage);
        let tasks = store.load_all(&username);
        Ok(Self {
            store,
            username,
            tasks,
        })
    }

    fn save(&mut self) -> anyhow::Result<()> {
        self.store.save_all(&self.username, &self.tasks)?;
        Ok(())
    }
}

fn not_found<W: Write>(out: &mut W, id: TaskId) -> anyhow::Result<()> {
    tracing::warn!("No task with ID {}", id);
    writeln!(out, "No task with ID {}", id)?;
    Ok(())
}

fn write_task<W: Write>(out: &mut W, task: &Task) -> std::io::Result<()> {
    let mark = if task.is_completed() { "x" } else { " " };
    write!(
        out,
        "[{}] {} {} ({}, created {})",
        mark,
        task.id(),
        task.title(),
        task.priority(),
        task.created_at().with_timezone(&Local).format("%Y-%m-%d %H:%M")
    )?;
    if let Some(due) = task.due_date() {
        write!(out, " due {}", due)?;
    }
    for tag in task.tags() {
        write!(out, " #{}", tag)?;
    }
    writeln!(out)?;
    if !task.description().is_empty() {
        writeln!(out, "    {}", task.description())?;
    }
    Ok(())
}
