//! Task definitions and invocation
//!
//! An [`Application`] holds named [`TaskDefinition`]s. Invoking a task
//! validates its parameters, asks the [`ServiceFactory`] for an authenticated
//! service and runs the task's action. Ensure tasks invoke their destroy and
//! provision siblings instead of talking to GitHub themselves.

mod deploy_keys;
mod pull_requests;
mod releases;

pub use deploy_keys::{
    DeployKeysParams, destroy_deploy_key, destroy_deploy_keys, provision_deploy_key,
    provision_deploy_keys,
};
pub use pull_requests::{
    DEFAULT_COMMIT_MESSAGE, MergeParams, MergeRequest, format_commit_message, merge_pull_request,
};
pub use releases::{ReleaseParams, create_release};

use crate::error::{Error, Result};
use crate::platform::ServiceFactory;
use crate::progress::ProgressCallback;
use crate::types::RepositoryRef;
use tracing::{debug, warn};

/// Separator between namespace segments in task names
pub const NAMESPACE_SEPARATOR: char = ':';

/// Join a scope and a task name into a fully-qualified name
pub fn qualify(scope: &[String], name: &str) -> String {
    scope
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(name))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(&NAMESPACE_SEPARATOR.to_string())
}

/// Sibling task names an ensure task invokes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureParams {
    /// Destroy task name, relative to the ensure task's scope
    pub destroy_task_name: String,
    /// Provision task name, relative to the ensure task's scope
    pub provision_task_name: String,
    /// Keys the siblings operate on; validated up front
    pub keys: DeployKeysParams,
}

/// What a task does when invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Add deploy keys
    ProvisionDeployKeys(DeployKeysParams),
    /// Remove deploy keys by title
    DestroyDeployKeys(DeployKeysParams),
    /// Destroy then provision
    EnsureDeployKeys(EnsureParams),
    /// Merge the pull request for a branch
    MergePullRequest(MergeParams),
    /// Create a release and upload assets
    CreateRelease(ReleaseParams),
}

/// A named, described task with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    /// Task name within its scope
    pub name: String,
    /// Namespace path the task is defined in
    pub scope: Vec<String>,
    /// Human-readable description
    pub description: String,
    /// Target repository (`owner/repo`)
    pub repository: Option<String>,
    /// GitHub access token
    pub access_token: Option<String>,
    /// Action and its parameters
    pub action: TaskAction,
}

impl TaskDefinition {
    /// Fully-qualified task name
    pub fn full_name(&self) -> String {
        qualify(&self.scope, &self.name)
    }

    /// Fully-qualified name of a task in the same scope
    pub fn sibling(&self, name: &str) -> String {
        qualify(&self.scope, name)
    }

    fn require_repository(&self) -> Result<RepositoryRef> {
        self.repository
            .as_deref()
            .ok_or_else(|| Error::parameter_unset(&self.full_name(), "repository"))?
            .parse()
    }

    /// Repository and access token, both required
    fn credentials(&self) -> Result<(RepositoryRef, &str)> {
        let repository = self.require_repository()?;
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| Error::parameter_unset(&self.full_name(), "access_token"))?;
        Ok((repository, token))
    }
}

/// Collaborators a task invocation needs
#[derive(Clone, Copy)]
pub struct TaskContext<'a> {
    /// Creates an authenticated service per task
    pub factory: &'a dyn ServiceFactory,
    /// Receives progress output
    pub progress: &'a dyn ProgressCallback,
}

/// Registry of defined tasks
#[derive(Debug, Clone, Default)]
pub struct Application {
    tasks: Vec<TaskDefinition>,
}

impl Application {
    /// Create an empty application
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a task, replacing any task with the same fully-qualified name
    ///
    /// Returns the replaced definition, if there was one.
    pub fn define(&mut self, task: TaskDefinition) -> Option<TaskDefinition> {
        let full_name = task.full_name();
        debug!(task = %full_name, "defining task");
        match self.tasks.iter_mut().find(|t| t.full_name() == full_name) {
            Some(existing) => {
                warn!(task = %full_name, "task redefined, replacing earlier definition");
                Some(std::mem::replace(existing, task))
            }
            None => {
                self.tasks.push(task);
                None
            }
        }
    }

    /// All tasks in definition order
    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    /// Look up a task by fully-qualified name
    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|t| t.full_name() == name)
    }

    /// Check whether a task is defined
    pub fn has_task(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Invoke a task by fully-qualified name with positional arguments
    pub async fn invoke(&self, name: &str, args: &[String], ctx: TaskContext<'_>) -> Result<()> {
        let task = self
            .get(name)
            .ok_or_else(|| Error::TaskNotFound(name.to_string()))?;
        let full_name = task.full_name();

        debug!(task = %full_name, ?args, "invoking task");
        ctx.progress.on_task_start(&full_name, args).await;

        match &task.action {
            TaskAction::ProvisionDeployKeys(params) => {
                let (repository, token) = task.credentials()?;
                let keys = params.for_provision(&full_name)?;
                let platform = ctx.factory.connect(&repository, token).await?;
                match keys.as_slice() {
                    [key] if params.is_single() => {
                        provision_deploy_key(platform.as_ref(), key, ctx.progress).await
                    }
                    _ => provision_deploy_keys(platform.as_ref(), &keys, ctx.progress).await,
                }
            }
            TaskAction::DestroyDeployKeys(params) => {
                let (repository, token) = task.credentials()?;
                let keys = params.for_destroy(&full_name)?;
                let platform = ctx.factory.connect(&repository, token).await?;
                match keys.as_slice() {
                    [key] if params.is_single() => {
                        destroy_deploy_key(platform.as_ref(), key, ctx.progress).await
                    }
                    _ => destroy_deploy_keys(platform.as_ref(), &keys, ctx.progress).await,
                }
            }
            TaskAction::EnsureDeployKeys(params) => {
                task.require_repository()?;
                params.keys.for_destroy(&full_name)?;

                let destroy = task.sibling(&params.destroy_task_name);
                let provision = task.sibling(&params.provision_task_name);
                Box::pin(self.invoke(&destroy, args, ctx)).await?;
                Box::pin(self.invoke(&provision, args, ctx)).await
            }
            TaskAction::MergePullRequest(params) => {
                let (repository, token) = task.credentials()?;
                let request = params.resolve(&full_name, args)?;
                let platform = ctx.factory.connect(&repository, token).await?;
                merge_pull_request(platform.as_ref(), &request, ctx.progress).await
            }
            TaskAction::CreateRelease(params) => {
                let (repository, token) = task.credentials()?;
                let spec = params.to_spec(&full_name)?;
                let platform = ctx.factory.connect(&repository, token).await?;
                create_release(platform.as_ref(), &spec, ctx.progress).await
            }
        }
    }
}
