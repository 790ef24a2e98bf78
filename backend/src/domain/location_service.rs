//! Hospital location use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    AssignmentRepository, HospitalRepository, LocationAdmin, LocationPatch, LocationQuery,
    LocationRepository, NewLocation,
};
use crate::domain::service_support::{name_taken, not_found, retain_active};
use crate::domain::{
    Actor, AssignmentFilter, AssignmentKind, Audit, CascadeReport, EntityName, Error, HospitalId,
    Location, LocationId, LocationKind, OrganizationId,
};

/// Location service implementing [`LocationAdmin`].
#[derive(Clone)]
pub struct LocationService<H, L, A> {
    hospitals: Arc<H>,
    locations: Arc<L>,
    assignments: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<H, L, A> LocationService<H, L, A> {
    pub fn new(
        hospitals: Arc<H>,
        locations: Arc<L>,
        assignments: Arc<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            hospitals,
            locations,
            assignments,
            clock,
        }
    }
}

impl<H, L, A> LocationService<H, L, A>
where
    H: HospitalRepository,
    L: LocationRepository,
    A: AssignmentRepository,
{
    async fn ensure_hospital(
        &self,
        org_id: OrganizationId,
        hospital_id: HospitalId,
    ) -> Result<(), Error> {
        match self.hospitals.find_by_id(org_id, hospital_id).await? {
            Some(_) => Ok(()),
            None => Err(not_found("hospital", hospital_id)),
        }
    }

    async fn load(&self, org_id: OrganizationId, id: LocationId) -> Result<Location, Error> {
        self.locations
            .find_by_id(org_id, id)
            .await?
            .ok_or_else(|| not_found("location", id))
    }

    async fn ensure_name_free(
        &self,
        hospital_id: HospitalId,
        name: &EntityName,
        except: Option<LocationId>,
    ) -> Result<(), Error> {
        match self
            .locations
            .find_by_name_key(hospital_id, &name.key())
            .await?
        {
            Some(existing) if Some(existing.id) != except => {
                Err(name_taken("location", name, "in this hospital"))
            }
            _ => Ok(()),
        }
    }

    /// A ward linked to departments must stay a ward.
    async fn ensure_not_serving_as_ward(&self, location: &Location) -> Result<(), Error> {
        let filter = AssignmentFilter {
            kind: Some(AssignmentKind::WardDepartment),
            location_id: Some(location.id),
            include_inactive: true,
            ..AssignmentFilter::default()
        };
        let links = self.assignments.list(location.org_id, &filter).await?;
        if links.is_empty() {
            Ok(())
        } else {
            Err(Error::conflict(
                "location is linked to departments as a ward; remove those assignments first",
            ))
        }
    }
}

#[async_trait]
impl<H, L, A> LocationAdmin for LocationService<H, L, A>
where
    H: HospitalRepository,
    L: LocationRepository,
    A: AssignmentRepository,
{
    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        hospital_id: HospitalId,
        input: NewLocation,
    ) -> Result<Location, Error> {
        actor.require_manage(org_id)?;
        self.ensure_hospital(org_id, hospital_id).await?;
        self.ensure_name_free(hospital_id, &input.name, None).await?;
        let location = Location {
            id: LocationId::random(),
            org_id,
            hospital_id,
            name: input.name,
            kind: input.kind,
            active: true,
            audit: Audit::created(self.clock.utc(), Some(actor.user_id)),
        };
        self.locations.insert(&location).await?;
        Ok(location)
    }

    async fn get(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: LocationId,
    ) -> Result<Location, Error> {
        actor.require_read(org_id)?;
        self.load(org_id, id).await
    }

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        query: LocationQuery,
    ) -> Result<Vec<Location>, Error> {
        actor.require_read(org_id)?;
        if let Some(hospital_id) = query.hospital_id {
            self.ensure_hospital(org_id, hospital_id).await?;
        }
        let locations = self.locations.list(org_id, query.hospital_id).await?;
        Ok(retain_active(locations, query.include_inactive, |l| {
            l.active
        }))
    }

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: LocationId,
        patch: LocationPatch,
    ) -> Result<Location, Error> {
        actor.require_manage(org_id)?;
        let mut location = self.load(org_id, id).await?;
        if let Some(name) = patch.name {
            self.ensure_name_free(location.hospital_id, &name, Some(id))
                .await?;
            location.name = name;
        }
        if let Some(kind) = patch.kind {
            if location.is_ward() && kind != LocationKind::Ward {
                self.ensure_not_serving_as_ward(&location).await?;
            }
            location.kind = kind;
        }
        if let Some(active) = patch.active {
            location.active = active;
        }
        location.audit.touch(self.clock.utc(), Some(actor.user_id));
        self.locations.update(&location).await?;
        Ok(location)
    }

    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: LocationId,
    ) -> Result<CascadeReport, Error> {
        actor.require_manage(org_id)?;
        self.load(org_id, id).await?;
        let removed = self.locations.delete_with_assignments(id).await?;
        tracing::info!(location_id = %id, assignments = removed, "location deleted");
        Ok(CascadeReport::assignments(removed))
    }
}
