use clap::{Parser, Subcommand};
use std::path::PathBuf;
use task_tracker_core::{Priority, StatusFilter, TaskId};

#[derive(Parser, Debug)]
#[command(name = "task-cli", version, about = "Track personal tasks, stored locally per user")]
pub struct Cli {
    /// Storage file to use instead of the configured one
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    /// Act as this user instead of the logged-in one
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Remember a username as the current user
    Login { username: String },
    /// Forget the current user; their tasks are kept
    Logout,
    /// Print the current user
    Whoami,
    /// List every user with stored tasks
    Users,
    /// Add a task
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date, e.g. 2025-03-01
        #[arg(long)]
        due: Option<String>,
        /// Comma-separated tags, e.g. "work, personal"
        #[arg(short, long, default_value = "")]
        tags: String,
    },
    /// Edit a task; fields not given keep their current value
    Edit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(long)]
        due: Option<String>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        /// Comma-separated tags, replacing the current ones
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// Flip a task between completed and pending
    Toggle { id: TaskId },
    /// Delete a task
    Delete { id: TaskId },
    /// Show tasks, optionally filtered by status and a search term
    List {
        #[arg(short, long, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
        /// Case-insensitive text to look for in title, description and tags
        #[arg(short, long, default_value = "")]
        search: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_options() {
        // Act
        let cli = Cli::try_parse_from([
            "task-cli", "add", "Buy Groceries", "-d", "Milk", "-p", "high", "--due",
            "2025-03-01", "-t", "personal, home",
        ])
        .unwrap();

        // Assert
        match cli.command {
            Commands::Add {
                title,
                description,
                priority,
                due,
                tags,
            } => {
                assert_eq!(title, "Buy Groceries");
                assert_eq!(description, "Milk");
                assert_eq!(priority, Priority::High);
                assert_eq!(due.as_deref(), Some("2025-03-01"));
                assert_eq!(tags, "personal, home");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["task-cli", "list"]).unwrap();

        match cli.command {
            Commands::List { filter, search } => {
                assert_eq!(filter, StatusFilter::All);
                assert_eq!(search, "");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli =
            Cli::try_parse_from(["task-cli", "list", "--user", "bob", "--storage", "x.json"])
                .unwrap();

        assert_eq!(cli.user.as_deref(), Some("bob"));
        assert_eq!(cli.storage, Some(PathBuf::from("x.json")));
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        assert!(Cli::try_parse_from(["task-cli", "list", "--filter", "done"]).is_err());
    }

    #[test]
    fn test_clear_due_conflicts_with_due() {
        let args = ["task-cli", "edit", "1", "--due", "2025-01-01", "--clear-due"];

        assert!(Cli::try_parse_from(args).is_err());
    }
}
