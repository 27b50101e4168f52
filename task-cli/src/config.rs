use serde::Deserialize;
use std::path::PathBuf;

/// Base name of the optional configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "task-tracker";
/// Prefix of environment variables overriding the configuration file.
pub const ENV_PREFIX: &str = "TASK_TRACKER";

#[derive(Deserialize, Debug, PartialEq)]
pub struct Config {
    /// File holding the persisted key-value storage.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    /// Maximum level of log events written to stderr.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Loads configuration from `task-tracker.toml` (if present) and `TASK_TRACKER_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// The configured log level, falling back to `warn` when it does not parse.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::WARN)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            log_level: default_log_level(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("task-tracker.json")
}

fn default_log_level() -> String {
    "warn".to_string()
}
