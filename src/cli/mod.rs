//! CLI commands

pub mod context;
pub mod list;
pub mod run;
pub mod style;

use anstream::println;
use async_trait::async_trait;
use gh_tasks::progress::ProgressCallback;
use style::{Stylize, arrow};

/// Progress callback printing to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct CliProgress {
    /// Also announce every task as it starts
    verbose: bool,
}

impl CliProgress {
    /// Print progress lines only
    pub const fn compact() -> Self {
        Self { verbose: false }
    }

    /// Print progress lines and task starts
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_task_start(&self, task: &str, args: &[String]) {
        if !self.verbose {
            return;
        }
        if args.is_empty() {
            println!("{} {}", arrow(), task.emphasis());
        } else {
            println!(
                "{} {} {}",
                arrow(),
                task.emphasis(),
                format!("[{}]", args.join(", ")).muted()
            );
        }
    }

    async fn on_message(&self, message: &str) {
        println!("{message}");
    }
}
