//! Organization use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{OrganizationAdmin, OrganizationPatch, OrganizationRepository};
use crate::domain::service_support::{name_taken, not_found, retain_active};
use crate::domain::{Actor, Audit, EntityName, Error, Organization, OrganizationId};

/// Organization service implementing [`OrganizationAdmin`].
#[derive(Clone)]
pub struct OrganizationService<O> {
    organizations: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<O> OrganizationService<O> {
    /// Create the service.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use hospadmin::domain::OrganizationService;
    /// # use hospadmin::outbound::memory::InMemoryStore;
    /// let store = Arc::new(InMemoryStore::default());
    /// let _service = OrganizationService::new(store, Arc::new(DefaultClock));
    /// ```
    pub fn new(organizations: Arc<O>, clock: Arc<dyn Clock>) -> Self {
        Self {
            organizations,
            clock,
        }
    }
}

impl<O: OrganizationRepository> OrganizationService<O> {
    async fn load(&self, id: OrganizationId) -> Result<Organization, Error> {
        self.organizations
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found("organization", id))
    }

    async fn ensure_name_free(
        &self,
        name: &EntityName,
        except: Option<OrganizationId>,
    ) -> Result<(), Error> {
        match self.organizations.find_by_name_key(&name.key()).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(name_taken("organization", name, "on this platform"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<O> OrganizationAdmin for OrganizationService<O>
where
    O: OrganizationRepository,
{
    async fn create(&self, actor: &Actor, name: EntityName) -> Result<Organization, Error> {
        actor.require_super_admin()?;
        self.ensure_name_free(&name, None).await?;
        let organization = Organization {
            id: OrganizationId::random(),
            name,
            active: true,
            audit: Audit::created(self.clock.utc(), Some(actor.user_id)),
        };
        self.organizations.insert(&organization).await?;
        tracing::info!(org_id = %organization.id, "organization created");
        Ok(organization)
    }

    async fn get(&self, actor: &Actor, id: OrganizationId) -> Result<Organization, Error> {
        actor.require_read(id)?;
        self.load(id).await
    }

    async fn list(
        &self,
        actor: &Actor,
        include_inactive: bool,
    ) -> Result<Vec<Organization>, Error> {
        let organizations = if actor.is_super_admin() {
            self.organizations.list().await?
        } else {
            vec![self.load(actor.org_id).await?]
        };
        Ok(retain_active(organizations, include_inactive, |org| {
            org.active
        }))
    }

    async fn update(
        &self,
        actor: &Actor,
        id: OrganizationId,
        patch: OrganizationPatch,
    ) -> Result<Organization, Error> {
        actor.require_manage(id)?;
        let mut organization = self.load(id).await?;
        if let Some(name) = patch.name {
            self.ensure_name_free(&name, Some(id)).await?;
            organization.name = name;
        }
        if let Some(active) = patch.active {
            organization.active = active;
        }
        organization
            .audit
            .touch(self.clock.utc(), Some(actor.user_id));
        self.organizations.update(&organization).await?;
        Ok(organization)
    }

    async fn delete(&self, actor: &Actor, id: OrganizationId) -> Result<(), Error> {
        actor.require_super_admin()?;
        self.load(id).await?;
        let dependants = self.organizations.dependants(id).await?;
        if !dependants.is_empty() {
            return Err(Error::conflict(
                "organization still owns hospitals, departments or users",
            )
            .with_details(json!({
                "hospitals": dependants.hospitals,
                "departments": dependants.departments,
                "users": dependants.users,
            })));
        }
        if !self.organizations.delete(id).await? {
            return Err(not_found("organization", id));
        }
        tracing::info!(org_id = %id, "organization deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "organization_service_tests.rs"]
mod tests;
