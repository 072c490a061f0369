//! Platform services for GitHub
//!
//! Tasks never talk to GitHub directly. They receive a [`PlatformService`]
//! from a [`ServiceFactory`], so tests can swap in a mock.

mod factory;
mod github;

pub use factory::{GitHubServiceFactory, ServiceFactory, create_platform_service};
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    CreateReleaseRequest, DeployKey, MergeResult, PlatformConfig, PullRequest, Release,
    ReleaseAsset,
};
use async_trait::async_trait;
use std::path::Path;

/// Repository operations used by the tasks
///
/// An implementation is bound to a single repository, given by
/// [`PlatformService::config`].
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;

    // =========================================================================
    // Deploy keys
    // =========================================================================

    /// List the repository's deploy keys in API order
    async fn list_deploy_keys(&self) -> Result<Vec<DeployKey>>;

    /// Add a deploy key
    async fn add_deploy_key(
        &self,
        title: &str,
        public_key: &str,
        read_only: bool,
    ) -> Result<DeployKey>;

    /// Remove a deploy key by ID
    async fn remove_deploy_key(&self, key_id: u64) -> Result<()>;

    // =========================================================================
    // Pull requests
    // =========================================================================

    /// List open pull requests in API order
    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>>;

    /// Merge a pull request with the given commit message
    async fn merge_pull_request(&self, pr_number: u64, commit_message: &str)
    -> Result<MergeResult>;

    // =========================================================================
    // Releases
    // =========================================================================

    /// Create a release
    async fn create_release(&self, request: &CreateReleaseRequest) -> Result<Release>;

    /// Upload a file to a release
    ///
    /// Without an explicit `name` the file's basename is used.
    async fn upload_release_asset(
        &self,
        release: &Release,
        path: &Path,
        name: Option<&str>,
    ) -> Result<ReleaseAsset>;
}
