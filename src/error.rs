//! Error types for gh-tasks

use thiserror::Error;

/// Errors raised while defining or running tasks
#[derive(Debug, Error)]
pub enum Error {
    /// A mandatory task parameter was never set
    #[error("required parameter '{parameter}' is unset for task '{task}'")]
    RequiredParameterUnset {
        /// Fully-qualified task name
        task: String,
        /// Parameter name
        parameter: String,
    },

    /// A mandatory invocation argument is missing or blank
    #[error("required argument '{argument}' is unset for task '{task}'")]
    RequiredArgumentUnset {
        /// Fully-qualified task name
        task: String,
        /// Argument name
        argument: String,
    },

    /// No open pull request has the requested head branch
    #[error("No pull request associated with branch {0}")]
    NoPullRequest(String),

    /// Task name not defined
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// Repository reference is not of the form `owner/repo`
    #[error("invalid repository '{0}', expected 'owner/repo'")]
    InvalidRepository(String),

    /// Configuration file problem
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication problem
    #[error("authentication error: {0}")]
    Auth(String),

    /// Release asset could not be read
    #[error("asset error: {0}")]
    Asset(String),

    /// GitHub API error with context
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Error surfaced by octocrab
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Error surfaced by raw HTTP requests
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a [`Error::RequiredParameterUnset`]
    pub fn parameter_unset(task: &str, parameter: &str) -> Self {
        Self::RequiredParameterUnset {
            task: task.to_string(),
            parameter: parameter.to_string(),
        }
    }

    /// Build a [`Error::RequiredArgumentUnset`]
    pub fn argument_unset(task: &str, argument: &str) -> Self {
        Self::RequiredArgumentUnset {
            task: task.to_string(),
            argument: argument.to_string(),
        }
    }
}
