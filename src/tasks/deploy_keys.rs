//! Deploy key provision and destroy actions

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::progress::ProgressCallback;
use crate::types::{DeployKey, DeployKeySpec};
use tracing::debug;

/// Keys a deploy key task operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployKeysParams {
    /// Any number of keys (may be empty)
    List(Vec<DeployKeySpec>),
    /// Exactly one key whose `title` and `public_key` are required parameters
    Single {
        /// Key title
        title: Option<String>,
        /// SSH public key text
        public_key: Option<String>,
        /// Read-only flag
        read_only: bool,
    },
}

impl Default for DeployKeysParams {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl DeployKeysParams {
    /// Whether this is the single-key form
    pub const fn is_single(&self) -> bool {
        matches!(self, Self::Single { .. })
    }

    /// Keys to destroy; only titles are needed
    pub fn for_destroy(&self, task: &str) -> Result<Vec<DeployKeySpec>> {
        match self {
            Self::List(keys) => Ok(keys.clone()),
            Self::Single {
                title,
                public_key,
                read_only,
            } => {
                let title = title
                    .clone()
                    .ok_or_else(|| Error::parameter_unset(task, "title"))?;
                Ok(vec![DeployKeySpec {
                    title,
                    public_key: public_key.clone(),
                    read_only: *read_only,
                }])
            }
        }
    }

    /// Keys to provision; every key needs a public key
    pub fn for_provision(&self, task: &str) -> Result<Vec<DeployKeySpec>> {
        let keys = self.for_destroy(task)?;
        if keys.iter().any(|k| k.public_key.is_none()) {
            return Err(Error::parameter_unset(task, "public_key"));
        }
        Ok(keys)
    }
}

/// Add each key to the repository, in order
///
/// There is no duplicate detection; GitHub decides whether a key with an
/// existing title or key text is accepted.
pub async fn provision_deploy_keys(
    platform: &dyn PlatformService,
    keys: &[DeployKeySpec],
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let repository = &platform.config().repository;
    progress
        .on_message(&format!(
            "Adding specified deploy keys to the '{repository}' repository..."
        ))
        .await;

    for key in keys {
        let public_key = key.public_key.as_deref().unwrap_or_default();
        progress
            .on_message(&format!("Adding '{}'...", key.title))
            .await;
        let added = platform
            .add_deploy_key(&key.title, public_key, key.read_only)
            .await?;
        debug!(title = %key.title, key_id = added.id, "provisioned deploy key");
    }

    Ok(())
}

/// Remove the remote keys whose titles match the given keys
///
/// Remote keys are listed once. For each requested key the first remote key
/// with exactly the same title is removed; requested keys without a match
/// are skipped.
pub async fn destroy_deploy_keys(
    platform: &dyn PlatformService,
    keys: &[DeployKeySpec],
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let repository = &platform.config().repository;
    progress
        .on_message(&format!(
            "Removing specified deploy keys from the '{repository}' repository..."
        ))
        .await;

    let remote_keys = platform.list_deploy_keys().await?;

    for key in keys {
        progress
            .on_message(&format!("Removing '{}' key...", key.title))
            .await;

        remove_first_match(platform, &remote_keys, key).await?;
    }

    Ok(())
}

/// Add a single deploy key
pub async fn provision_deploy_key(
    platform: &dyn PlatformService,
    key: &DeployKeySpec,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    progress
        .on_message(&format!(
            "Adding deploy key '{}' to the '{}' repository...",
            key.title,
            platform.config().repository
        ))
        .await;

    let public_key = key.public_key.as_deref().unwrap_or_default();
    let added = platform
        .add_deploy_key(&key.title, public_key, key.read_only)
        .await?;
    debug!(title = %key.title, key_id = added.id, "provisioned deploy key");
    Ok(())
}

/// Remove the first remote key titled like `key`, if any
pub async fn destroy_deploy_key(
    platform: &dyn PlatformService,
    key: &DeployKeySpec,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    progress
        .on_message(&format!(
            "Removing deploy key '{}' from the '{}' repository...",
            key.title,
            platform.config().repository
        ))
        .await;

    let remote_keys = platform.list_deploy_keys().await?;
    remove_first_match(platform, &remote_keys, key).await
}

async fn remove_first_match(
    platform: &dyn PlatformService,
    remote_keys: &[DeployKey],
    key: &DeployKeySpec,
) -> Result<()> {
    match remote_keys.iter().find(|remote| remote.title == key.title) {
        Some(remote) => platform.remove_deploy_key(remote.id).await,
        None => {
            debug!(title = %key.title, "no matching deploy key, skipping");
            Ok(())
        }
    }
}
