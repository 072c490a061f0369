//! Progress reporting for task execution

use async_trait::async_trait;

/// Receives task lifecycle events and user-facing progress lines
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when a task starts, with the arguments it was invoked with
    async fn on_task_start(&self, task: &str, args: &[String]);

    /// Called with a progress line
    async fn on_message(&self, message: &str);
}

/// Progress callback that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_task_start(&self, _task: &str, _args: &[String]) {}

    async fn on_message(&self, _message: &str) {}
}
