use clap::Parser;
use task_cli::cli::Cli;
use task_cli::config::Config;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = Config::load()?;
    task_cli::init_logging(&config);
    task_cli::run(args, &config)
}
