//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CreateReleaseRequest, DeployKey, MergeResult, PlatformConfig, PullRequest, Release,
    ReleaseAsset, RepositoryRef,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use std::path::Path;
use tracing::debug;
use url::Url;

/// GitHub service using octocrab
///
/// Deploy key changes and asset uploads go through raw HTTP requests,
/// everything else through octocrab.
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// REST API base URL for raw requests
    api_base: String,
}

#[derive(Serialize)]
struct AddDeployKeyRequest<'a> {
    title: &'a str,
    key: &'a str,
    read_only: bool,
}

impl GitHubService {
    /// Create a new GitHub service for github.com or an Enterprise host
    pub fn new(token: &str, repository: RepositoryRef, host: Option<String>) -> Result<Self> {
        let api_base = host.as_ref().map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        let mut service = Self::with_api_base(token, repository, &api_base)?;
        service.config.host = host;
        Ok(service)
    }

    /// Create a service against an explicit REST API base URL
    pub fn with_api_base(token: &str, repository: RepositoryRef, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("gh-tasks")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                repository,
                host: None,
            },
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn owner(&self) -> &str {
        &self.config.repository.owner
    }

    fn repo(&self) -> &str {
        &self.config.repository.repo
    }

    /// URL of a repository-scoped REST endpoint
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{path}",
            self.api_base,
            self.owner(),
            self.repo()
        )
    }

    /// Authenticated raw request
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

/// Turn a non-success response into an error carrying GitHub's message
async fn check_response(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::GitHubApi(format!("{context}: {status} {body}")))
}

/// Asset name for an upload: explicit name, else the file's basename
pub(crate) fn asset_file_name(path: &Path, name: Option<&str>) -> Result<String> {
    if let Some(name) = name {
        return Ok(name.to_string());
    }
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Asset(format!("cannot derive asset name from {}", path.display())))
}

/// Expand a release `upload_url` template into a concrete upload URL
pub(crate) fn upload_endpoint(upload_url: &str, name: &str) -> Result<Url> {
    let base = upload_url
        .split_once('{')
        .map_or(upload_url, |(base, _)| base);
    let mut url = Url::parse(base)
        .map_err(|e| Error::GitHubApi(format!("Invalid upload URL '{upload_url}': {e}")))?;
    url.query_pairs_mut().append_pair("name", name);
    Ok(url)
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        head_ref: pr.head.ref_field.clone(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    async fn list_deploy_keys(&self) -> Result<Vec<DeployKey>> {
        debug!(repository = %self.config.repository, "listing deploy keys");
        let route = format!("/repos/{}/{}/keys", self.owner(), self.repo());
        let page: octocrab::Page<DeployKey> =
            self.client.get(route, Some(&[("per_page", 100)])).await?;

        let keys = self.client.all_pages(page).await?;
        debug!(count = keys.len(), "listed deploy keys");
        Ok(keys)
    }

    async fn add_deploy_key(
        &self,
        title: &str,
        public_key: &str,
        read_only: bool,
    ) -> Result<DeployKey> {
        debug!(title, read_only, "adding deploy key");
        let url = self.repo_url("keys");

        let response = self
            .request(Method::POST, &url)
            .json(&AddDeployKeyRequest {
                title,
                key: public_key,
                read_only,
            })
            .send()
            .await?;
        let response = check_response(response, "Failed to add deploy key").await?;
        let key: DeployKey = response.json().await?;

        debug!(key_id = key.id, "added deploy key");
        Ok(key)
    }

    async fn remove_deploy_key(&self, key_id: u64) -> Result<()> {
        debug!(key_id, "removing deploy key");
        let url = self.repo_url(&format!("keys/{key_id}"));

        let response = self.request(Method::DELETE, &url).send().await?;
        check_response(response, "Failed to remove deploy key").await?;

        debug!(key_id, "removed deploy key");
        Ok(())
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        debug!(repository = %self.config.repository, "listing open pull requests");
        let page = self
            .client
            .pulls(self.owner(), self.repo())
            .list()
            .state(octocrab::params::State::Open)
            .per_page(100)
            .send()
            .await?;

        let prs = self.client.all_pages(page).await?;
        let result: Vec<PullRequest> = prs.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "listed open pull requests");
        Ok(result)
    }

    async fn merge_pull_request(
        &self,
        pr_number: u64,
        commit_message: &str,
    ) -> Result<MergeResult> {
        debug!(pr_number, commit_message, "merging PR");
        let pulls = self.client.pulls(self.owner(), self.repo());
        let merge = pulls
            .merge(pr_number)
            .message(commit_message)
            .send()
            .await?;

        let result = MergeResult {
            merged: merge.merged,
            sha: merge.sha,
            message: merge.message,
        };

        debug!(
            pr_number,
            merged = result.merged,
            sha = ?result.sha,
            "merge complete"
        );
        Ok(result)
    }

    async fn create_release(&self, request: &CreateReleaseRequest) -> Result<Release> {
        debug!(tag = %request.tag_name, "creating release");
        let route = format!("/repos/{}/{}/releases", self.owner(), self.repo());
        let release: Release = self.client.post(route, Some(request)).await?;

        debug!(release_id = release.id, "created release");
        Ok(release)
    }

    async fn upload_release_asset(
        &self,
        release: &Release,
        path: &Path,
        name: Option<&str>,
    ) -> Result<ReleaseAsset> {
        let asset_name = asset_file_name(path, name)?;
        let url = upload_endpoint(&release.upload_url, &asset_name)?;
        debug!(path = %path.display(), name = %asset_name, "uploading release asset");

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Asset(format!("failed to read {}: {e}", path.display())))?;

        let response = self
            .request(Method::POST, url.as_str())
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        let response = check_response(response, "Failed to upload release asset").await?;
        let asset: ReleaseAsset = response.json().await?;

        debug!(asset_id = asset.id, "uploaded release asset");
        Ok(asset)
    }
}
