//! Repository traits for data access
//!
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{ChangeRecord, Organization};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// In-place edit applied to an organization inside a repository transaction
pub type OrganizationEdit<'a> =
    dyn Fn(&mut Organization) -> Result<ChangeRecord> + Send + Sync + 'a;

/// Repository for organizations
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Insert a new organization
    async fn create(&self, org: &Organization) -> Result<Organization>;

    /// Find an organization by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>>;

    /// Load the organization, apply `edit` and persist the result in one
    /// transaction.
    ///
    /// Returns `Ok(None)` when the organization does not exist. When `edit`
    /// or the write fails nothing is persisted and the error is returned.
    async fn modify(
        &self,
        id: Uuid,
        edit: &OrganizationEdit<'_>,
    ) -> Result<Option<(Organization, ChangeRecord)>>;
}
