//! Shared command context for CLI commands
//!
//! Extracts the setup shared by `list` and `run`.

use gh_tasks::auth::get_github_auth;
use gh_tasks::config::{Config, find_config};
use gh_tasks::error::Result;
use gh_tasks::task_sets::build_application;
use gh_tasks::tasks::Application;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loaded configuration and the tasks it defines
pub struct CommandContext {
    /// Path the configuration was read from
    pub config_path: PathBuf,
    /// Parsed configuration (after overrides)
    pub config: Config,
    /// Defined tasks
    pub app: Application,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// - Locate and parse the configuration file
    /// - Apply the `--repository` override
    /// - Resolve an access token when `resolve_auth` is set
    /// - Define every task
    ///
    /// A token that cannot be resolved is not an error here; tasks that need
    /// one fail with an unset-parameter error when invoked.
    pub async fn new(
        config: Option<&Path>,
        repository: Option<&str>,
        resolve_auth: bool,
    ) -> Result<Self> {
        let working_dir = std::env::current_dir()?;
        let config_path = find_config(config, &working_dir)?;
        debug!(path = %config_path.display(), "loading configuration");
        let mut config = Config::load(&config_path)?;

        if let Some(repository) = repository {
            config.repository = Some(repository.to_string());
        }

        if resolve_auth {
            match get_github_auth(config.access_token.as_deref()).await {
                Ok(auth) => {
                    debug!(source = ?auth.source, "resolved GitHub token");
                    config.access_token = Some(auth.token);
                }
                Err(e) => debug!(error = %e, "no GitHub token available"),
            }
        }

        let app = build_application(&config);

        Ok(Self {
            config_path,
            config,
            app,
        })
    }
}
