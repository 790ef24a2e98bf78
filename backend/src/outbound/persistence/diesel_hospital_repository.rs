//! PostgreSQL-backed `HospitalRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HospitalRepository, RepositoryError};
use crate::domain::{Hospital, HospitalId, OrganizationId};

use super::diesel_error_mapping::{affected, counted, map_diesel_error, map_pool_error};
use super::models::{HospitalRow, rows_into};
use super::pool::DbPool;
use super::schema::{hospitals, locations};

/// Diesel-backed implementation of the `HospitalRepository` port.
#[derive(Clone)]
pub struct DieselHospitalRepository {
    pool: DbPool,
}

impl DieselHospitalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HospitalRepository for DieselHospitalRepository {
    async fn insert(&self, hospital: &Hospital) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(hospitals::table)
            .values(HospitalRow::from(hospital))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, hospital: &Hospital) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = HospitalRow::from(hospital);
        diesel::update(hospitals::table.find(row.id))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: HospitalId,
    ) -> Result<Option<Hospital>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<HospitalRow> = hospitals::table
            .filter(hospitals::id.eq(id.as_uuid()))
            .filter(hospitals::org_id.eq(org_id.as_uuid()))
            .select(HospitalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Hospital::try_from).transpose()
    }

    async fn find_by_name_key(
        &self,
        org_id: OrganizationId,
        key: &str,
    ) -> Result<Option<Hospital>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<HospitalRow> = hospitals::table
            .filter(hospitals::org_id.eq(org_id.as_uuid()))
            .filter(hospitals::name_key.eq(key))
            .select(HospitalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Hospital::try_from).transpose()
    }

    async fn list(&self, org_id: OrganizationId) -> Result<Vec<Hospital>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<HospitalRow> = hospitals::table
            .filter(hospitals::org_id.eq(org_id.as_uuid()))
            .select(HospitalRow::as_select())
            .order_by(hospitals::name_key)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_into(rows)
    }

    async fn count_locations(&self, id: HospitalId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = locations::table
            .filter(locations::hospital_id.eq(id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(counted(count))
    }

    async fn delete(&self, id: HospitalId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(hospitals::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected(removed) > 0)
    }
}
