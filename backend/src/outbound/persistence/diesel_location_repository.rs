//! PostgreSQL-backed `LocationRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{LocationRepository, RepositoryError};
use crate::domain::{HospitalId, Location, LocationId, OrganizationId};

use super::diesel_error_mapping::{affected, map_diesel_error, map_pool_error};
use super::models::{LocationRow, rows_into};
use super::pool::DbPool;
use super::schema::{assignments, locations};

/// Diesel-backed implementation of the `LocationRepository` port.
#[derive(Clone)]
pub struct DieselLocationRepository {
    pool: DbPool,
}

impl DieselLocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for DieselLocationRepository {
    async fn insert(&self, location: &Location) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(locations::table)
            .values(LocationRow::from(location))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, location: &Location) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = LocationRow::from(location);
        diesel::update(locations::table.find(row.id))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: LocationId,
    ) -> Result<Option<Location>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LocationRow> = locations::table
            .filter(locations::id.eq(id.as_uuid()))
            .filter(locations::org_id.eq(org_id.as_uuid()))
            .select(LocationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Location::try_from).transpose()
    }

    async fn find_by_name_key(
        &self,
        hospital_id: HospitalId,
        key: &str,
    ) -> Result<Option<Location>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LocationRow> = locations::table
            .filter(locations::hospital_id.eq(hospital_id.as_uuid()))
            .filter(locations::name_key.eq(key))
            .select(LocationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Location::try_from).transpose()
    }

    async fn list(
        &self,
        org_id: OrganizationId,
        hospital_id: Option<HospitalId>,
    ) -> Result<Vec<Location>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = locations::table
            .filter(locations::org_id.eq(*org_id.as_uuid()))
            .select(LocationRow::as_select())
            .order_by(locations::name_key)
            .into_boxed();
        if let Some(hospital_id) = hospital_id {
            query = query.filter(locations::hospital_id.eq(*hospital_id.as_uuid()));
        }
        let rows: Vec<LocationRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_into(rows)
    }

    async fn delete_with_assignments(&self, id: LocationId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let location = *id.as_uuid();
        conn.transaction(|conn| {
            async move {
                let removed =
                    diesel::delete(assignments::table.filter(assignments::location_id.eq(location)))
                        .execute(conn)
                        .await?;
                diesel::delete(locations::table.find(location))
                    .execute(conn)
                    .await?;
                Ok(affected(removed))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
