//! Port for user persistence.

use async_trait::async_trait;

use crate::domain::{EmailAddress, OrganizationId, User, UserId};

use super::RepositoryError;

/// Storage for organization users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    async fn update(&self, user: &User) -> Result<(), RepositoryError>;

    /// Look up a user in any organization; used to resolve sessions.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(
        &self,
        org_id: OrganizationId,
        email: &EmailAddress,
    ) -> Result<Option<User>, RepositoryError>;

    /// Users of the organization ordered by display name.
    async fn list(&self, org_id: OrganizationId) -> Result<Vec<User>, RepositoryError>;

    /// Users of the organization among `ids`, ordered by display name.
    async fn find_many(
        &self,
        org_id: OrganizationId,
        ids: &[UserId],
    ) -> Result<Vec<User>, RepositoryError>;

    /// Delete the user and their assignments; returns assignments removed.
    async fn delete_with_assignments(&self, id: UserId) -> Result<u64, RepositoryError>;
}
