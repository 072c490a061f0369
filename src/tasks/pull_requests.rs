//! Pull request merge action

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::progress::ProgressCallback;
use serde::Deserialize;
use tracing::debug;

/// Commit message template used when none is given
pub const DEFAULT_COMMIT_MESSAGE: &str = "%s";

/// Parameters of the merge task
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MergeParams {
    /// Branch used when no `branch_name` argument is given
    #[serde(default)]
    pub branch_name: Option<String>,
    /// Commit message template used when no `commit_message` argument is given
    #[serde(default)]
    pub commit_message: Option<String>,
}

/// Branch and commit message template for one merge invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Head branch of the pull request to merge
    pub branch_name: String,
    /// Commit message template
    pub commit_message: String,
}

impl MergeParams {
    /// Combine invocation arguments (`branch_name`, `commit_message`) with
    /// the task's parameters
    ///
    /// A missing or blank branch name fails before anything else happens.
    /// A blank commit message falls back to the parameter, then to `"%s"`.
    pub fn resolve(&self, task: &str, args: &[String]) -> Result<MergeRequest> {
        let branch_name = args
            .first()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .or_else(|| self.branch_name.as_deref().map(str::trim))
            .filter(|b| !b.is_empty())
            .ok_or_else(|| Error::argument_unset(task, "branch_name"))?;

        let commit_message = args
            .get(1)
            .filter(|m| !m.trim().is_empty())
            .or(self.commit_message.as_ref())
            .map_or(DEFAULT_COMMIT_MESSAGE, String::as_str);

        Ok(MergeRequest {
            branch_name: branch_name.to_string(),
            commit_message: commit_message.to_string(),
        })
    }
}

/// Substitute `title` for each `%s` in `template`; `%%` is a literal `%`
pub fn format_commit_message(template: &str, title: &str) -> String {
    let mut message = String::with_capacity(template.len() + title.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            message.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                message.push_str(title);
            }
            Some('%') => {
                chars.next();
                message.push('%');
            }
            _ => message.push('%'),
        }
    }

    message
}

/// Merge the first open pull request whose head branch is `branch_name`
pub async fn merge_pull_request(
    platform: &dyn PlatformService,
    request: &MergeRequest,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let open_prs = platform.list_open_pull_requests().await?;

    let pr = open_prs
        .iter()
        .find(|pr| pr.head_ref == request.branch_name)
        .ok_or_else(|| Error::NoPullRequest(request.branch_name.clone()))?;

    let message = format_commit_message(&request.commit_message, &pr.title);
    progress
        .on_message(&format!(
            "Merging pull request #{} '{}' on the '{}' repository...",
            pr.number,
            pr.title,
            platform.config().repository
        ))
        .await;

    let result = platform.merge_pull_request(pr.number, &message).await?;
    if !result.merged {
        return Err(Error::GitHubApi(format!(
            "Pull request #{} was not merged: {}",
            pr.number,
            result.message.as_deref().unwrap_or("no reason given")
        )));
    }

    debug!(pr_number = pr.number, sha = ?result.sha, "merged pull request");
    Ok(())
}
