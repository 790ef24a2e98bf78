//! User use-cases and session actor resolution.
//!
//! Every committed create, update or delete is handed to the
//! [`UserChangePublisher`] after the write succeeds. Publishing never fails
//! the request; identity sync runs on its own.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    ActorResolver, NewUser, OrganizationRepository, UserAdmin, UserChangePublisher, UserPatch,
    UserRepository,
};
use crate::domain::service_support::{not_found, retain_active};
use crate::domain::{
    Actor, Audit, CascadeReport, EmailAddress, Error, OrganizationId, User, UserChange, UserId,
    UserRole,
};
use serde_json::json;

/// User service implementing [`UserAdmin`] and [`ActorResolver`].
#[derive(Clone)]
pub struct UserService<O, U> {
    organizations: Arc<O>,
    users: Arc<U>,
    publisher: Arc<dyn UserChangePublisher>,
    clock: Arc<dyn Clock>,
}

impl<O, U> UserService<O, U> {
    pub fn new(
        organizations: Arc<O>,
        users: Arc<U>,
        publisher: Arc<dyn UserChangePublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            organizations,
            users,
            publisher,
            clock,
        }
    }
}

fn email_taken(email: &EmailAddress) -> Error {
    Error::conflict(format!(
        "email {email} is already in use in this organization"
    ))
    .with_details(json!({ "field": "email", "code": "duplicate" }))
}

impl<O, U> UserService<O, U>
where
    O: OrganizationRepository,
    U: UserRepository,
{
    async fn load(&self, org_id: OrganizationId, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .filter(|user| user.org_id == org_id)
            .ok_or_else(|| not_found("user", id))
    }

    async fn ensure_email_free(
        &self,
        org_id: OrganizationId,
        email: &EmailAddress,
        except: Option<UserId>,
    ) -> Result<(), Error> {
        match self.users.find_by_email(org_id, email).await? {
            Some(existing) if Some(existing.id) != except => Err(email_taken(email)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<O, U> UserAdmin for UserService<O, U>
where
    O: OrganizationRepository,
    U: UserRepository,
{
    async fn current(&self, actor: &Actor) -> Result<User, Error> {
        self.users
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }

    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        input: NewUser,
    ) -> Result<User, Error> {
        actor.require_manage(org_id)?;
        if input.role == UserRole::SuperAdmin {
            actor.require_super_admin()?;
        }
        if self.organizations.find_by_id(org_id).await?.is_none() {
            return Err(not_found("organization", org_id));
        }
        self.ensure_email_free(org_id, &input.email, None).await?;
        let user = User {
            id: UserId::random(),
            org_id,
            email: input.email,
            display_name: input.display_name,
            role: input.role,
            active: input.active,
            audit: Audit::created(self.clock.utc(), Some(actor.user_id)),
        };
        self.users.insert(&user).await?;
        self.publisher.publish(UserChange::Created(user.clone()));
        Ok(user)
    }

    async fn get(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: UserId,
    ) -> Result<User, Error> {
        actor.require_read(org_id)?;
        self.load(org_id, id).await
    }

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        include_inactive: bool,
    ) -> Result<Vec<User>, Error> {
        actor.require_read(org_id)?;
        if self.organizations.find_by_id(org_id).await?.is_none() {
            return Err(not_found("organization", org_id));
        }
        let users = self.users.list(org_id).await?;
        Ok(retain_active(users, include_inactive, |u| u.active))
    }

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: UserId,
        patch: UserPatch,
    ) -> Result<User, Error> {
        actor.require_manage(org_id)?;
        let before = self.load(org_id, id).await?;
        if before.role == UserRole::SuperAdmin || patch.role == Some(UserRole::SuperAdmin) {
            actor.require_super_admin()?;
        }
        if id == actor.user_id && patch.active == Some(false) {
            return Err(Error::forbidden("you cannot deactivate your own account"));
        }
        let mut after = before.clone();
        if let Some(email) = patch.email {
            if email != before.email {
                self.ensure_email_free(org_id, &email, Some(id)).await?;
            }
            after.email = email;
        }
        if let Some(display_name) = patch.display_name {
            after.display_name = display_name;
        }
        if let Some(role) = patch.role {
            after.role = role;
        }
        if let Some(active) = patch.active {
            after.active = active;
        }
        after.audit.touch(self.clock.utc(), Some(actor.user_id));
        self.users.update(&after).await?;
        self.publisher.publish(UserChange::Updated {
            before,
            after: after.clone(),
        });
        Ok(after)
    }

    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: UserId,
    ) -> Result<CascadeReport, Error> {
        actor.require_manage(org_id)?;
        if id == actor.user_id {
            return Err(Error::forbidden("you cannot delete your own account"));
        }
        let user = self.load(org_id, id).await?;
        if user.role == UserRole::SuperAdmin {
            actor.require_super_admin()?;
        }
        let removed = self.users.delete_with_assignments(id).await?;
        self.publisher.publish(UserChange::Deleted(user));
        Ok(CascadeReport::assignments(removed))
    }
}

#[async_trait]
impl<O, U> ActorResolver for UserService<O, U>
where
    O: OrganizationRepository,
    U: UserRepository,
{
    async fn resolve(&self, user_id: UserId) -> Result<Actor, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))?;
        Actor::for_user(&user)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
