//! Driving port for user use-cases.

use async_trait::async_trait;

use crate::domain::{
    Actor, CascadeReport, DisplayName, EmailAddress, Error, OrganizationId, User, UserId, UserRole,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub role: UserRole,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<EmailAddress>,
    pub display_name: Option<DisplayName>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

/// User administration. Successful writes are published for identity sync.
#[async_trait]
pub trait UserAdmin: Send + Sync {
    /// The signed-in user.
    async fn current(&self, actor: &Actor) -> Result<User, Error>;

    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        input: NewUser,
    ) -> Result<User, Error>;

    async fn get(&self, actor: &Actor, org_id: OrganizationId, id: UserId)
    -> Result<User, Error>;

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        include_inactive: bool,
    ) -> Result<Vec<User>, Error>;

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: UserId,
        patch: UserPatch,
    ) -> Result<User, Error>;

    /// Delete a user and their assignments. Actors cannot delete themselves.
    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: UserId,
    ) -> Result<CascadeReport, Error>;
}

/// Resolves the acting user for an authenticated session.
#[async_trait]
pub trait ActorResolver: Send + Sync {
    /// Load the session's user and turn it into an [`Actor`].
    ///
    /// Unknown users are `unauthorized`; inactive users are `forbidden`.
    async fn resolve(&self, user_id: UserId) -> Result<Actor, Error>;
}
