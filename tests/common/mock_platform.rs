//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use gh_tasks::error::{Error, Result};
use gh_tasks::platform::{PlatformService, ServiceFactory};
use gh_tasks::progress::ProgressCallback;
use gh_tasks::types::{
    CreateReleaseRequest, DeployKey, MergeResult, PlatformConfig, PullRequest, Release,
    ReleaseAsset, RepositoryRef,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A recorded platform call, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    ListDeployKeys,
    AddDeployKey {
        title: String,
        public_key: String,
        read_only: bool,
    },
    RemoveDeployKey(u64),
    ListOpenPullRequests,
    MergePullRequest {
        pr_number: u64,
        commit_message: String,
    },
    CreateRelease(CreateReleaseRequest),
    UploadReleaseAsset {
        upload_url: String,
        path: PathBuf,
        name: Option<String>,
    },
}

#[derive(Default)]
struct MockState {
    next_key_id: AtomicU64,
    deploy_keys: Mutex<Vec<DeployKey>>,
    pull_requests: Mutex<Vec<PullRequest>>,
    merge_response: Mutex<Option<MergeResult>>,
    calls: Mutex<Vec<PlatformCall>>,
    // Error injection
    error_on_list_keys: Mutex<Option<String>>,
    error_on_add_key: Mutex<Option<String>>,
    error_on_merge: Mutex<Option<String>>,
    error_on_create_release: Mutex<Option<String>>,
    error_on_upload: Mutex<Option<(usize, String)>>,
}

/// Simple mock platform service for testing
///
/// Keeps an in-memory list of deploy keys so destroy/provision sequences
/// can be checked against the resulting state. Clones share state, which
/// lets a [`MockServiceFactory`] hand out the same mock to every task.
///
/// Features:
/// - Stateful deploy keys with auto-incrementing IDs
/// - Ordered call tracking for verification
/// - Configurable pull requests and merge response
/// - Error injection for failure path testing
#[derive(Clone)]
pub struct MockPlatformService {
    config: PlatformConfig,
    state: Arc<MockState>,
}

impl MockPlatformService {
    /// Create a new mock for the given repository
    pub fn new(repository: &str) -> Self {
        let repository: RepositoryRef = repository.parse().expect("valid repository");
        let state = MockState {
            next_key_id: AtomicU64::new(1),
            ..MockState::default()
        };
        Self {
            config: PlatformConfig {
                repository,
                host: None,
            },
            state: Arc::new(state),
        }
    }

    // === Setup methods ===

    /// Seed a remote deploy key, returning its ID
    pub fn add_remote_key(&self, title: &str) -> u64 {
        let id = self.state.next_key_id.fetch_add(1, Ordering::SeqCst);
        self.state.deploy_keys.lock().unwrap().push(DeployKey {
            id,
            title: title.to_string(),
            key: format!("ssh-ed25519 AAAA {title}"),
            read_only: false,
        });
        id
    }

    /// Set the open pull requests, in API order
    pub fn set_pull_requests(&self, prs: Vec<PullRequest>) {
        *self.state.pull_requests.lock().unwrap() = prs;
    }

    /// Set the response for `merge_pull_request`
    pub fn set_merge_response(&self, result: MergeResult) {
        *self.state.merge_response.lock().unwrap() = Some(result);
    }

    // === Error injection methods ===

    /// Make `list_deploy_keys` return an error
    pub fn fail_list_deploy_keys(&self, msg: &str) {
        *self.state.error_on_list_keys.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_deploy_key` return an error
    pub fn fail_add_deploy_key(&self, msg: &str) {
        *self.state.error_on_add_key.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pull_request` return an error
    pub fn fail_merge(&self, msg: &str) {
        *self.state.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_release` return an error
    pub fn fail_create_release(&self, msg: &str) {
        *self.state.error_on_create_release.lock().unwrap() = Some(msg.to_string());
    }

    /// Make the `index`-th (0-based) asset upload return an error
    pub fn fail_upload_at(&self, index: usize, msg: &str) {
        *self.state.error_on_upload.lock().unwrap() = Some((index, msg.to_string()));
    }

    // === Call verification methods ===

    /// All calls in order
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Titles of the remote keys currently present
    pub fn remote_key_titles(&self) -> Vec<String> {
        self.state
            .deploy_keys
            .lock()
            .unwrap()
            .iter()
            .map(|k| k.title.clone())
            .collect()
    }

    /// All `add_deploy_key` calls
    pub fn added_keys(&self) -> Vec<PlatformCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, PlatformCall::AddDeployKey { .. }))
            .collect()
    }

    /// IDs passed to `remove_deploy_key`
    pub fn removed_key_ids(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PlatformCall::RemoveDeployKey(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// `(path, name)` of every upload, in order
    pub fn uploads(&self) -> Vec<(PathBuf, Option<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PlatformCall::UploadReleaseAsset { path, name, .. } => Some((path, name)),
                _ => None,
            })
            .collect()
    }

    /// `(pr_number, commit_message)` of every merge
    pub fn merges(&self) -> Vec<(u64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PlatformCall::MergePullRequest {
                    pr_number,
                    commit_message,
                } => Some((pr_number, commit_message)),
                _ => None,
            })
            .collect()
    }

    /// Assert that no platform call happened
    pub fn assert_no_calls(&self) {
        let calls = self.calls();
        assert!(calls.is_empty(), "Expected no platform calls but got: {calls:?}");
    }

    fn record(&self, call: PlatformCall) {
        self.state.calls.lock().unwrap().push(call);
    }

    fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
        match slot.lock().unwrap().as_ref() {
            Some(msg) => Err(Error::GitHubApi(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    async fn list_deploy_keys(&self) -> Result<Vec<DeployKey>> {
        self.record(PlatformCall::ListDeployKeys);
        Self::injected(&self.state.error_on_list_keys)?;
        Ok(self.state.deploy_keys.lock().unwrap().clone())
    }

    async fn add_deploy_key(
        &self,
        title: &str,
        public_key: &str,
        read_only: bool,
    ) -> Result<DeployKey> {
        self.record(PlatformCall::AddDeployKey {
            title: title.to_string(),
            public_key: public_key.to_string(),
            read_only,
        });
        Self::injected(&self.state.error_on_add_key)?;

        let key = DeployKey {
            id: self.state.next_key_id.fetch_add(1, Ordering::SeqCst),
            title: title.to_string(),
            key: public_key.to_string(),
            read_only,
        };
        self.state.deploy_keys.lock().unwrap().push(key.clone());
        Ok(key)
    }

    async fn remove_deploy_key(&self, key_id: u64) -> Result<()> {
        self.record(PlatformCall::RemoveDeployKey(key_id));
        self.state
            .deploy_keys
            .lock()
            .unwrap()
            .retain(|k| k.id != key_id);
        Ok(())
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        self.record(PlatformCall::ListOpenPullRequests);
        Ok(self.state.pull_requests.lock().unwrap().clone())
    }

    async fn merge_pull_request(
        &self,
        pr_number: u64,
        commit_message: &str,
    ) -> Result<MergeResult> {
        self.record(PlatformCall::MergePullRequest {
            pr_number,
            commit_message: commit_message.to_string(),
        });
        Self::injected(&self.state.error_on_merge)?;

        Ok(self
            .state
            .merge_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(MergeResult {
                merged: true,
                sha: Some(format!("merged_sha_{pr_number}")),
                message: None,
            }))
    }

    async fn create_release(&self, request: &CreateReleaseRequest) -> Result<Release> {
        self.record(PlatformCall::CreateRelease(request.clone()));
        Self::injected(&self.state.error_on_create_release)?;

        Ok(Release {
            id: 1,
            upload_url: format!(
                "https://uploads.github.com/repos/{}/releases/1/assets{{?name,label}}",
                self.config.repository
            ),
            html_url: format!(
                "https://github.com/{}/releases/tag/{}",
                self.config.repository, request.tag_name
            ),
        })
    }

    async fn upload_release_asset(
        &self,
        release: &Release,
        path: &Path,
        name: Option<&str>,
    ) -> Result<ReleaseAsset> {
        let index = self.uploads().len();
        self.record(PlatformCall::UploadReleaseAsset {
            upload_url: release.upload_url.clone(),
            path: path.to_path_buf(),
            name: name.map(ToString::to_string),
        });

        if let Some((fail_index, msg)) = self.state.error_on_upload.lock().unwrap().as_ref()
            && *fail_index == index
        {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let asset_name = name.map_or_else(
            || {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            },
            ToString::to_string,
        );
        Ok(ReleaseAsset {
            id: index as u64 + 1,
            name: asset_name,
            browser_download_url: String::new(),
        })
    }
}

/// Factory handing out one shared mock and recording every connection
pub struct MockServiceFactory {
    platform: MockPlatformService,
    connections: Mutex<Vec<(String, String)>>,
    error_on_connect: Mutex<Option<String>>,
}

impl MockServiceFactory {
    /// Factory returning clones of `platform`
    pub fn new(platform: &MockPlatformService) -> Self {
        Self {
            platform: platform.clone(),
            connections: Mutex::new(Vec::new()),
            error_on_connect: Mutex::new(None),
        }
    }

    /// Make `connect` fail (e.g. bad credentials)
    pub fn fail_connect(&self, msg: &str) {
        *self.error_on_connect.lock().unwrap() = Some(msg.to_string());
    }

    /// `(repository, access_token)` of every connection, in order
    pub fn connections(&self) -> Vec<(String, String)> {
        self.connections.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceFactory for MockServiceFactory {
    async fn connect(
        &self,
        repository: &RepositoryRef,
        access_token: &str,
    ) -> Result<Box<dyn PlatformService>> {
        self.connections
            .lock()
            .unwrap()
            .push((repository.to_string(), access_token.to_string()));

        if let Some(msg) = self.error_on_connect.lock().unwrap().as_ref() {
            return Err(Error::Auth(msg.clone()));
        }
        Ok(Box::new(self.platform.clone()))
    }
}

/// A recorded progress event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    TaskStart { task: String, args: Vec<String> },
    Message(String),
}

/// Progress callback recording every event
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    /// All events in order
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Progress lines only
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Message(m) => Some(m),
                ProgressEvent::TaskStart { .. } => None,
            })
            .collect()
    }

    /// Task starts only
    pub fn task_starts(&self) -> Vec<(String, Vec<String>)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::TaskStart { task, args } => Some((task, args)),
                ProgressEvent::Message(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_task_start(&self, task: &str, args: &[String]) {
        self.events.lock().unwrap().push(ProgressEvent::TaskStart {
            task: task.to_string(),
            args: args.to_vec(),
        });
    }

    async fn on_message(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Message(message.to_string()));
    }
}
