//! Hospital use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    HospitalAdmin, HospitalPatch, HospitalRepository, NewHospital, OrganizationRepository,
};
use crate::domain::service_support::{name_taken, normalise_text, not_found, retain_active};
use crate::domain::{Actor, Audit, EntityName, Error, Hospital, HospitalId, OrganizationId};

/// Hospital service implementing [`HospitalAdmin`].
#[derive(Clone)]
pub struct HospitalService<O, H> {
    organizations: Arc<O>,
    hospitals: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<O, H> HospitalService<O, H> {
    pub fn new(organizations: Arc<O>, hospitals: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            organizations,
            hospitals,
            clock,
        }
    }
}

impl<O, H> HospitalService<O, H>
where
    O: OrganizationRepository,
    H: HospitalRepository,
{
    async fn ensure_organization(&self, org_id: OrganizationId) -> Result<(), Error> {
        match self.organizations.find_by_id(org_id).await? {
            Some(_) => Ok(()),
            None => Err(not_found("organization", org_id)),
        }
    }

    async fn load(&self, org_id: OrganizationId, id: HospitalId) -> Result<Hospital, Error> {
        self.hospitals
            .find_by_id(org_id, id)
            .await?
            .ok_or_else(|| not_found("hospital", id))
    }

    async fn ensure_name_free(
        &self,
        org_id: OrganizationId,
        name: &EntityName,
        except: Option<HospitalId>,
    ) -> Result<(), Error> {
        match self.hospitals.find_by_name_key(org_id, &name.key()).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(name_taken("hospital", name, "in this organization"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<O, H> HospitalAdmin for HospitalService<O, H>
where
    O: OrganizationRepository,
    H: HospitalRepository,
{
    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        input: NewHospital,
    ) -> Result<Hospital, Error> {
        actor.require_manage(org_id)?;
        self.ensure_organization(org_id).await?;
        self.ensure_name_free(org_id, &input.name, None).await?;
        let hospital = Hospital {
            id: HospitalId::random(),
            org_id,
            name: input.name,
            address: normalise_text(input.address),
            active: true,
            audit: Audit::created(self.clock.utc(), Some(actor.user_id)),
        };
        self.hospitals.insert(&hospital).await?;
        Ok(hospital)
    }

    async fn get(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: HospitalId,
    ) -> Result<Hospital, Error> {
        actor.require_read(org_id)?;
        self.load(org_id, id).await
    }

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        include_inactive: bool,
    ) -> Result<Vec<Hospital>, Error> {
        actor.require_read(org_id)?;
        self.ensure_organization(org_id).await?;
        let hospitals = self.hospitals.list(org_id).await?;
        Ok(retain_active(hospitals, include_inactive, |h| h.active))
    }

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: HospitalId,
        patch: HospitalPatch,
    ) -> Result<Hospital, Error> {
        actor.require_manage(org_id)?;
        let mut hospital = self.load(org_id, id).await?;
        if let Some(name) = patch.name {
            self.ensure_name_free(org_id, &name, Some(id)).await?;
            hospital.name = name;
        }
        if let Some(address) = patch.address {
            hospital.address = normalise_text(address);
        }
        if let Some(active) = patch.active {
            hospital.active = active;
        }
        hospital.audit.touch(self.clock.utc(), Some(actor.user_id));
        self.hospitals.update(&hospital).await?;
        Ok(hospital)
    }

    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: HospitalId,
    ) -> Result<(), Error> {
        actor.require_manage(org_id)?;
        self.load(org_id, id).await?;
        let locations = self.hospitals.count_locations(id).await?;
        if locations > 0 {
            return Err(
                Error::conflict("hospital still has locations; delete them first")
                    .with_details(json!({ "locations": locations })),
            );
        }
        if !self.hospitals.delete(id).await? {
            return Err(not_found("hospital", id));
        }
        Ok(())
    }
}
