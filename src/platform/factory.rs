//! Construction of authenticated platform services

use crate::error::Result;
use crate::platform::{GitHubService, PlatformService};
use crate::types::{PlatformConfig, RepositoryRef};
use async_trait::async_trait;
use tracing::debug;

/// Creates one authenticated service per task invocation
#[async_trait]
pub trait ServiceFactory: Send + Sync {
    /// Build a service for `repository` authenticated with `access_token`
    async fn connect(
        &self,
        repository: &RepositoryRef,
        access_token: &str,
    ) -> Result<Box<dyn PlatformService>>;
}

/// Factory producing [`GitHubService`] instances
#[derive(Debug, Clone, Default)]
pub struct GitHubServiceFactory {
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl GitHubServiceFactory {
    /// Create a factory for github.com or an Enterprise host
    pub const fn new(host: Option<String>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl ServiceFactory for GitHubServiceFactory {
    async fn connect(
        &self,
        repository: &RepositoryRef,
        access_token: &str,
    ) -> Result<Box<dyn PlatformService>> {
        let config = PlatformConfig {
            repository: repository.clone(),
            host: self.host.clone(),
        };
        create_platform_service(&config, access_token).await
    }
}

/// Create a platform service for the given configuration
pub async fn create_platform_service(
    config: &PlatformConfig,
    access_token: &str,
) -> Result<Box<dyn PlatformService>> {
    debug!(repository = %config.repository, host = ?config.host, "creating GitHub service");
    let service = GitHubService::new(access_token, config.repository.clone(), config.host.clone())?;
    Ok(Box::new(service))
}
