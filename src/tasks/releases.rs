//! Release creation action

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::progress::ProgressCallback;
use crate::types::{AssetSpec, CreateReleaseRequest, ReleaseSpec};
use serde::Deserialize;
use tracing::debug;

/// Parameters of the release task, as configured
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReleaseParams {
    /// Tag to release (required)
    #[serde(default)]
    pub tag_name: Option<String>,
    /// Commitish for the tag
    #[serde(default)]
    pub target_commitish: Option<String>,
    /// Release title
    #[serde(default)]
    pub release_name: Option<String>,
    /// Release notes
    #[serde(default)]
    pub body: Option<String>,
    /// Create as draft
    #[serde(default)]
    pub draft: bool,
    /// Mark as prerelease
    #[serde(default)]
    pub prerelease: bool,
    /// Discussion category
    #[serde(default)]
    pub discussion_category_name: Option<String>,
    /// Files to upload
    #[serde(default)]
    pub assets: Vec<AssetSpec>,
}

impl ReleaseParams {
    /// Validate into a [`ReleaseSpec`]
    pub fn to_spec(&self, task: &str) -> Result<ReleaseSpec> {
        let tag_name = self
            .tag_name
            .clone()
            .ok_or_else(|| Error::parameter_unset(task, "tag_name"))?;

        Ok(ReleaseSpec {
            tag_name,
            target_commitish: self.target_commitish.clone(),
            release_name: self.release_name.clone(),
            body: self.body.clone(),
            draft: self.draft,
            prerelease: self.prerelease,
            discussion_category_name: self.discussion_category_name.clone(),
            assets: self.assets.clone(),
        })
    }
}

fn creating_release_message(spec: &ReleaseSpec, repository: &str) -> String {
    let name = spec
        .release_name
        .as_ref()
        .map(|n| format!(" '{n}'"))
        .unwrap_or_default();
    format!(
        "Creating release{name} with tag '{}' on '{repository}' repository...",
        spec.tag_name
    )
}

fn uploading_asset_message(asset: &AssetSpec, tag_name: &str) -> String {
    let path = asset.path().display();
    match asset {
        AssetSpec::Path(_) => {
            format!("Uploading asset '{path}' to release with tag '{tag_name}'...")
        }
        AssetSpec::Named { name, .. } => {
            let with_name = name
                .as_ref()
                .map(|n| format!(" with name '{n}'"))
                .unwrap_or_default();
            format!("Uploading asset '{path}'{with_name} to release with tag '{tag_name}'...")
        }
    }
}

/// Create the release, then upload its assets in order
///
/// A failed upload aborts the task; the release itself stays in place.
pub async fn create_release(
    platform: &dyn PlatformService,
    spec: &ReleaseSpec,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let repository = platform.config().repository.to_string();
    progress
        .on_message(&creating_release_message(spec, &repository))
        .await;

    let release = platform
        .create_release(&CreateReleaseRequest::from(spec))
        .await?;
    debug!(release_id = release.id, url = %release.html_url, "release created");

    for asset in &spec.assets {
        progress
            .on_message(&uploading_asset_message(asset, &spec.tag_name))
            .await;
        let uploaded = platform
            .upload_release_asset(&release, asset.path(), asset.name())
            .await?;
        debug!(asset_id = uploaded.id, name = %uploaded.name, "asset uploaded");
    }

    Ok(())
}
