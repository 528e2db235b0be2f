//! Resource provider trait and implementations for lazyhcloud
//!
//! This crate provides an abstraction over the cloud API with a consistent
//! list / get-by-ID interface per resource kind, plus the Hetzner Cloud REST
//! client that implements it.

mod error;
mod hcloud;
#[cfg(feature = "test-support")]
pub mod test_support;
mod types;

pub use error::*;
pub use hcloud::{HcloudClient, HcloudConnector, DEFAULT_ENDPOINT};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Read access to one project's resources, plus snapshot requests
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// List every resource of a kind
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>>;

    /// Fetch a single resource by ID. `Ok(None)` means it does not exist.
    async fn get(&self, kind: ResourceKind, id: u64) -> Result<Option<Resource>>;

    /// Ask the API to create a snapshot image of a server
    async fn create_snapshot(&self, server_id: u64, description: &str) -> Result<SnapshotInfo>;
}

/// Builds an authenticated provider from a project credential
pub trait Connector: Send + Sync {
    fn connect(&self, token: &str) -> Result<Arc<dyn ResourceProvider>>;
}

/// Fetch a resource that must exist, turning "not found" into an error
pub async fn get_existing(
    provider: &dyn ResourceProvider,
    kind: ResourceKind,
    id: u64,
) -> Result<Resource> {
    provider
        .get(kind, id)
        .await?
        .ok_or_else(|| ProviderError::NotFound(format!("{} {}", kind.noun(), id)))
}
