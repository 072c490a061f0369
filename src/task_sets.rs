//! Task sets: groups of task definitions built from one configuration block
//!
//! The repository task set places the deploy key tasks under their configured
//! namespace and the merge task under `pull_requests`, all sharing one
//! repository, access token and key list.

use crate::config::{Config, DeployKeySetConfig, DeployKeysSetConfig, ReleaseTaskConfig};
use crate::tasks::{
    Application, DeployKeysParams, EnsureParams, MergeParams, TaskAction, TaskDefinition,
};

/// Namespace of the merge task within the repository task set
pub const PULL_REQUESTS_NAMESPACE: &str = "pull_requests";

/// Name of the merge task
pub const MERGE_TASK_NAME: &str = "merge";

/// Parameters every task in a set shares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedParams {
    /// Target repository (`owner/repo`)
    pub repository: Option<String>,
    /// GitHub access token
    pub access_token: Option<String>,
}

impl SharedParams {
    fn repository_label(&self) -> &str {
        self.repository.as_deref().unwrap_or("<unset>")
    }

    fn task(
        &self,
        scope: &[String],
        name: &str,
        description: String,
        action: TaskAction,
    ) -> TaskDefinition {
        TaskDefinition {
            name: name.to_string(),
            scope: scope.to_vec(),
            description,
            repository: self.repository.clone(),
            access_token: self.access_token.clone(),
            action,
        }
    }
}

fn child_scope(scope: &[String], namespace: &str) -> Vec<String> {
    let mut child = scope.to_vec();
    if !namespace.is_empty() {
        child.push(namespace.to_string());
    }
    child
}

/// Define provision, destroy and ensure tasks for a list of keys
pub fn define_deploy_keys_tasks(
    app: &mut Application,
    scope: &[String],
    shared: &SharedParams,
    set: &DeployKeysSetConfig,
) {
    let scope = child_scope(scope, &set.namespace);
    let repository = shared.repository_label();
    let keys = DeployKeysParams::List(set.keys.clone());

    app.define(shared.task(
        &scope,
        &set.provision_task_name,
        format!("Provision deploy keys to the {repository} repository"),
        TaskAction::ProvisionDeployKeys(keys.clone()),
    ));
    app.define(shared.task(
        &scope,
        &set.destroy_task_name,
        format!("Destroys deploy keys from the {repository} repository"),
        TaskAction::DestroyDeployKeys(keys.clone()),
    ));
    app.define(shared.task(
        &scope,
        &set.ensure_task_name,
        format!("Ensure deploy keys are configured on the {repository} repository"),
        TaskAction::EnsureDeployKeys(EnsureParams {
            destroy_task_name: set.destroy_task_name.clone(),
            provision_task_name: set.provision_task_name.clone(),
            keys,
        }),
    ));
}

/// Define provision, destroy and ensure tasks for a single key
pub fn define_deploy_key_tasks(
    app: &mut Application,
    scope: &[String],
    shared: &SharedParams,
    set: &DeployKeySetConfig,
) {
    let scope = child_scope(scope, &set.namespace);
    let repository = shared.repository_label();
    let title = set.title.as_deref().unwrap_or("<unset>");
    let key = DeployKeysParams::Single {
        title: set.title.clone(),
        public_key: set.public_key.clone(),
        read_only: set.read_only,
    };

    app.define(shared.task(
        &scope,
        &set.provision_task_name,
        format!("Provision deploy key to the {repository} repository"),
        TaskAction::ProvisionDeployKeys(key.clone()),
    ));
    app.define(shared.task(
        &scope,
        &set.destroy_task_name,
        format!("Destroys deploy key from the {repository} repository"),
        TaskAction::DestroyDeployKeys(key.clone()),
    ));
    app.define(shared.task(
        &scope,
        &set.ensure_task_name,
        format!("Ensure deploy key {title} is configured on the {repository} repository"),
        TaskAction::EnsureDeployKeys(EnsureParams {
            destroy_task_name: set.destroy_task_name.clone(),
            provision_task_name: set.provision_task_name.clone(),
            keys: key,
        }),
    ));
}

/// Define the pull request merge task
pub fn define_merge_task(
    app: &mut Application,
    scope: &[String],
    shared: &SharedParams,
    params: &MergeParams,
) {
    let scope = child_scope(scope, PULL_REQUESTS_NAMESPACE);
    app.define(shared.task(
        &scope,
        MERGE_TASK_NAME,
        format!(
            "Merges pull request on the specified branch in the {} repository",
            shared.repository_label()
        ),
        TaskAction::MergePullRequest(params.clone()),
    ));
}

/// Define the release creation task
pub fn define_release_task(
    app: &mut Application,
    scope: &[String],
    shared: &SharedParams,
    release: &ReleaseTaskConfig,
) {
    let scope = child_scope(scope, &release.namespace);
    app.define(shared.task(
        &scope,
        &release.name,
        format!("Creates a release on the {} repository", shared.repository_label()),
        TaskAction::CreateRelease(release.params.clone()),
    ));
}

/// Define the repository task set: deploy keys plus pull request merge
pub fn define_repository_tasks(
    app: &mut Application,
    scope: &[String],
    shared: &SharedParams,
    config: &Config,
) {
    define_deploy_keys_tasks(app, scope, shared, &config.deploy_keys);
    define_merge_task(app, scope, shared, &config.pull_requests);
}

/// Build an application with every task the configuration declares
pub fn build_application(config: &Config) -> Application {
    let shared = SharedParams {
        repository: config.repository.clone(),
        access_token: config.access_token.clone(),
    };
    let scope: Vec<String> = config.namespace.iter().cloned().collect();

    let mut app = Application::new();
    define_repository_tasks(&mut app, &scope, &shared, config);
    for set in &config.deploy_key {
        define_deploy_key_tasks(&mut app, &scope, &shared, set);
    }
    if let Some(release) = &config.release {
        define_release_task(&mut app, &scope, &shared, release);
    }
    app
}
