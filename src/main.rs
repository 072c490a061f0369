//! ghtasks - declarative GitHub repository tasks

mod cli;

use anstream::eprintln;
use clap::{Parser, Subcommand};
use cli::run::RunOptions;
use cli::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter
const LOG_ENV: &str = "GHTASKS_LOG";

#[derive(Parser)]
#[command(
    name = "ghtasks",
    version,
    about = "Declarative GitHub repository tasks: deploy keys, pull request merges and releases"
)]
struct Cli {
    /// Path to the task configuration file (default: ./ghtasks.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Repository to operate on (owner/repo), overriding the configuration
    #[arg(short, long, global = true)]
    repository: Option<String>,

    /// Show task invocations and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List defined tasks with their descriptions
    List,

    /// Run a task by name, e.g. `ghtasks run pull_requests:merge my-branch`
    Run {
        /// Fully-qualified task name
        task: String,

        /// Positional task arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "gh_tasks=debug,ghtasks=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let repository = cli.repository.as_deref();

    let result = match cli.command {
        Commands::List => cli::list::run_list(config, repository).await,
        Commands::Run { task, args } => {
            cli::run::run_task(
                config,
                repository,
                &task,
                &args,
                RunOptions {
                    verbose: cli.verbose,
                },
            )
            .await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".error());
            ExitCode::FAILURE
        }
    }
}
