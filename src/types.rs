//! Core types for gh-tasks

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A GitHub repository reference (`owner/repo`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepositoryRef {
    /// Create a reference from its parts
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl FromStr for RepositoryRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self::new(owner, repo))
            }
            _ => Err(Error::InvalidRepository(s.to_string())),
        }
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Platform configuration for one repository
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Target repository
    pub repository: RepositoryRef,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

// =============================================================================
// Deploy keys
// =============================================================================

/// A deploy key as configured locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployKeySpec {
    /// Key title, used to match remote keys on destroy
    pub title: String,
    /// SSH public key text (only needed to provision)
    #[serde(default)]
    pub public_key: Option<String>,
    /// Whether the key grants read-only access
    #[serde(default)]
    pub read_only: bool,
}

impl DeployKeySpec {
    /// Spec with a public key, writable by default
    pub fn new(title: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            public_key: Some(public_key.into()),
            read_only: false,
        }
    }
}

/// A deploy key as reported by GitHub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployKey {
    /// Key ID
    pub id: u64,
    /// Key title
    pub title: String,
    /// Public key text
    pub key: String,
    /// Whether the key is read-only
    #[serde(default)]
    pub read_only: bool,
}

// =============================================================================
// Pull requests
// =============================================================================

/// An open pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Head (source) branch name
    pub head_ref: String,
    /// Web URL for the PR
    pub html_url: String,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

// =============================================================================
// Releases
// =============================================================================

/// A file to attach to a release
///
/// Written in configuration either as a bare path string or as a table with
/// `path` and an optional `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetSpec {
    /// Upload under the file's own name
    Path(PathBuf),
    /// Upload with an explicit name when one is given
    Named {
        /// File to upload
        path: PathBuf,
        /// Asset name on the release
        #[serde(default)]
        name: Option<String>,
    },
}

impl AssetSpec {
    /// Local file path
    pub fn path(&self) -> &Path {
        match self {
            Self::Path(path) | Self::Named { path, .. } => path,
        }
    }

    /// Explicit asset name, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Named { name, .. } => name.as_deref(),
        }
    }
}

/// A validated release definition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseSpec {
    /// Tag to create the release for
    pub tag_name: String,
    /// Commitish the tag is created from when it does not exist yet
    pub target_commitish: Option<String>,
    /// Release title
    pub release_name: Option<String>,
    /// Release notes
    pub body: Option<String>,
    /// Create as draft
    pub draft: bool,
    /// Mark as prerelease
    pub prerelease: bool,
    /// Discussion category to open a discussion in
    pub discussion_category_name: Option<String>,
    /// Files to upload, in order
    pub assets: Vec<AssetSpec>,
}

/// Payload for the create-release endpoint
///
/// Unset optional fields are left out of the JSON body entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReleaseRequest {
    /// Tag name
    pub tag_name: String,
    /// Commitish for the tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    /// Release title
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    /// Release notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Draft flag
    pub draft: bool,
    /// Prerelease flag
    pub prerelease: bool,
    /// Discussion category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_category_name: Option<String>,
}

impl From<&ReleaseSpec> for CreateReleaseRequest {
    fn from(spec: &ReleaseSpec) -> Self {
        Self {
            tag_name: spec.tag_name.clone(),
            target_commitish: spec.target_commitish.clone(),
            release_name: spec.release_name.clone(),
            body: spec.body.clone(),
            draft: spec.draft,
            prerelease: spec.prerelease,
            discussion_category_name: spec.discussion_category_name.clone(),
        }
    }
}

/// A created release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Release ID
    pub id: u64,
    /// Upload URL template (`.../assets{?name,label}`)
    pub upload_url: String,
    /// Web URL for the release
    #[serde(default)]
    pub html_url: String,
}

/// An uploaded release asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// Asset ID
    pub id: u64,
    /// Asset name
    pub name: String,
    /// Download URL
    #[serde(default)]
    pub browser_download_url: String,
}
