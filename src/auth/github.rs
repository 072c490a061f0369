//! GitHub token resolution

use super::AuthSource;
use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

/// A resolved GitHub token and where it came from
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Access token
    pub token: String,
    /// Where the token was found
    pub source: AuthSource,
}

/// Find a token in the environment using `lookup` (normally `std::env::var`)
pub fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<GitHubAuthConfig> {
    TOKEN_ENV_VARS.iter().find_map(|var| {
        lookup(var)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(|token| {
                debug!(var, "using GitHub token from environment");
                GitHubAuthConfig {
                    token,
                    source: AuthSource::EnvVar,
                }
            })
    })
}

/// Resolve a GitHub token
///
/// Precedence: `configured`, then `GH_TOKEN` / `GITHUB_TOKEN`, then
/// `gh auth token`.
pub async fn get_github_auth(configured: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(token) = configured.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(GitHubAuthConfig {
            token: token.to_string(),
            source: AuthSource::Config,
        });
    }

    if let Some(config) = token_from_env(|var| std::env::var(var).ok()) {
        return Ok(config);
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .map_err(|e| Error::Auth(format!("no token configured and `gh` is unavailable: {e}")))?;

    if !output.status.success() {
        return Err(Error::Auth(
            "no token configured; set GH_TOKEN or run `gh auth login`".to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("`gh auth token` returned an empty token".to_string()));
    }

    debug!("using GitHub token from gh CLI");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
    })
}
