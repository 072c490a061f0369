//! gh-tasks: declarative GitHub repository tasks
//!
//! Named, namespaced tasks that provision and remove deploy keys, merge the
//! pull request for a branch and publish releases with assets. Tasks are
//! declared in a TOML file and invoked by name.

pub mod auth;
pub mod config;
pub mod error;
pub mod platform;
pub mod progress;
pub mod task_sets;
pub mod tasks;
pub mod types;

pub use error::{Error, Result};
