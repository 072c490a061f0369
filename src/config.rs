//! Configuration file loading
//!
//! Tasks are declared in a TOML file, found at `--config`, `./ghtasks.toml`
//! or `<config dir>/ghtasks/config.toml`.

use crate::error::{Error, Result};
use crate::tasks::{MergeParams, ReleaseParams};
use crate::types::DeployKeySpec;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "ghtasks.toml";

/// Directory and filename under the user config directory
const USER_CONFIG_DIR: &str = "ghtasks";
const USER_CONFIG_FILE: &str = "config.toml";

fn default_deploy_keys_namespace() -> String {
    "deploy_keys".to_string()
}

fn default_releases_namespace() -> String {
    "releases".to_string()
}

fn default_provision_task_name() -> String {
    "provision".to_string()
}

fn default_destroy_task_name() -> String {
    "destroy".to_string()
}

fn default_ensure_task_name() -> String {
    "ensure".to_string()
}

fn default_create_task_name() -> String {
    "create".to_string()
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Target repository (`owner/repo`)
    #[serde(default)]
    pub repository: Option<String>,
    /// GitHub access token
    #[serde(default)]
    pub access_token: Option<String>,
    /// GitHub Enterprise host
    #[serde(default)]
    pub host: Option<String>,
    /// Namespace wrapping every task
    #[serde(default)]
    pub namespace: Option<String>,
    /// Multi-key deploy key tasks
    #[serde(default)]
    pub deploy_keys: DeployKeysSetConfig,
    /// Pull request merge task
    #[serde(default)]
    pub pull_requests: MergeParams,
    /// Single deploy key task sets, each in its own namespace
    #[serde(default)]
    pub deploy_key: Vec<DeployKeySetConfig>,
    /// Release creation task
    #[serde(default)]
    pub release: Option<ReleaseTaskConfig>,
}

/// Deploy key tasks over a list of keys
#[derive(Debug, Clone, Deserialize)]
pub struct DeployKeysSetConfig {
    /// Namespace of the deploy key tasks
    #[serde(default = "default_deploy_keys_namespace")]
    pub namespace: String,
    /// Name of the provision task
    #[serde(default = "default_provision_task_name")]
    pub provision_task_name: String,
    /// Name of the destroy task
    #[serde(default = "default_destroy_task_name")]
    pub destroy_task_name: String,
    /// Name of the ensure task
    #[serde(default = "default_ensure_task_name")]
    pub ensure_task_name: String,
    /// Keys to manage
    #[serde(default)]
    pub keys: Vec<DeployKeySpec>,
}

impl Default for DeployKeysSetConfig {
    fn default() -> Self {
        Self {
            namespace: default_deploy_keys_namespace(),
            provision_task_name: default_provision_task_name(),
            destroy_task_name: default_destroy_task_name(),
            ensure_task_name: default_ensure_task_name(),
            keys: Vec::new(),
        }
    }
}

/// Deploy key tasks over exactly one key
#[derive(Debug, Clone, Deserialize)]
pub struct DeployKeySetConfig {
    /// Namespace of this key's tasks
    pub namespace: String,
    /// Key title (required when a task runs)
    #[serde(default)]
    pub title: Option<String>,
    /// SSH public key text (required to provision)
    #[serde(default)]
    pub public_key: Option<String>,
    /// Read-only flag
    #[serde(default)]
    pub read_only: bool,
    /// Name of the provision task
    #[serde(default = "default_provision_task_name")]
    pub provision_task_name: String,
    /// Name of the destroy task
    #[serde(default = "default_destroy_task_name")]
    pub destroy_task_name: String,
    /// Name of the ensure task
    #[serde(default = "default_ensure_task_name")]
    pub ensure_task_name: String,
}

/// Release creation task
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseTaskConfig {
    /// Namespace of the release task
    #[serde(default = "default_releases_namespace")]
    pub namespace: String,
    /// Name of the release task
    #[serde(default = "default_create_task_name")]
    pub name: String,
    /// Release parameters
    #[serde(flatten)]
    pub params: ReleaseParams,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }
}

/// Locate the configuration file
///
/// An explicit path must exist. Otherwise `./ghtasks.toml` is preferred over
/// the user config directory.
pub fn find_config(explicit: Option<&Path>, working_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(Error::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let local = working_dir.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Ok(local);
    }

    if let Some(user) = dirs::config_dir().map(|d| d.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
        && user.is_file()
    {
        return Ok(user);
    }

    Err(Error::Config(format!(
        "no {LOCAL_CONFIG_FILE} found in {} and no user config",
        working_dir.display()
    )))
}
