//! Shared test helpers

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{
    MockPlatformService, MockServiceFactory, PlatformCall, ProgressEvent, RecordingProgress,
};

use gh_tasks::config::Config;
use gh_tasks::error::Result;
use gh_tasks::task_sets::build_application;
use gh_tasks::tasks::{Application, TaskContext};
use gh_tasks::types::PullRequest;

pub const REPOSITORY: &str = "org/repo";
pub const TOKEN: &str = "some-token";

/// Build an open pull request fixture
pub fn make_pr(number: u64, title: &str, head_ref: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        head_ref: head_ref.to_string(),
        html_url: format!("https://github.com/{REPOSITORY}/pull/{number}"),
    }
}

/// Build an application from TOML, with repository and token prepended
pub fn app_from_toml(toml: &str) -> Application {
    let content = format!("repository = \"{REPOSITORY}\"\naccess_token = \"{TOKEN}\"\n{toml}");
    let config = Config::from_toml_str(&content).expect("valid test config");
    build_application(&config)
}

/// Harness wiring a mock platform into task invocations
pub struct Harness {
    pub platform: MockPlatformService,
    pub factory: MockServiceFactory,
    pub progress: RecordingProgress,
}

impl Harness {
    pub fn new() -> Self {
        let platform = MockPlatformService::new(REPOSITORY);
        let factory = MockServiceFactory::new(&platform);
        Self {
            platform,
            factory,
            progress: RecordingProgress::default(),
        }
    }

    /// Invoke a task with string arguments
    pub async fn invoke(&self, app: &Application, task: &str, args: &[&str]) -> Result<()> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        app.invoke(
            task,
            &args,
            TaskContext {
                factory: &self.factory,
                progress: &self.progress,
            },
        )
        .await
    }
}
