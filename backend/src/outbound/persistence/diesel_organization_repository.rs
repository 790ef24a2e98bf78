//! PostgreSQL-backed `OrganizationRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OrganizationRepository, RepositoryError};
use crate::domain::{Organization, OrganizationDependants, OrganizationId};

use super::diesel_error_mapping::{affected, counted, map_diesel_error, map_pool_error};
use super::models::{OrganizationRow, rows_into};
use super::pool::DbPool;
use super::schema::{departments, hospitals, organizations, users};

/// Diesel-backed implementation of the `OrganizationRepository` port.
#[derive(Clone)]
pub struct DieselOrganizationRepository {
    pool: DbPool,
}

impl DieselOrganizationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationRepository for DieselOrganizationRepository {
    async fn insert(&self, organization: &Organization) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(organizations::table)
            .values(OrganizationRow::from(organization))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, organization: &Organization) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = OrganizationRow::from(organization);
        diesel::update(organizations::table.find(row.id))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<OrganizationRow> = organizations::table
            .find(*id.as_uuid())
            .select(OrganizationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Organization::try_from).transpose()
    }

    async fn find_by_name_key(&self, key: &str) -> Result<Option<Organization>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<OrganizationRow> = organizations::table
            .filter(organizations::name_key.eq(key))
            .select(OrganizationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Organization::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Organization>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrganizationRow> = organizations::table
            .select(OrganizationRow::as_select())
            .order_by(organizations::name_key)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_into(rows)
    }

    async fn dependants(
        &self,
        id: OrganizationId,
    ) -> Result<OrganizationDependants, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let org = id.as_uuid();
        let hospitals: i64 = hospitals::table
            .filter(hospitals::org_id.eq(org))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let departments: i64 = departments::table
            .filter(departments::org_id.eq(org))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let users: i64 = users::table
            .filter(users::org_id.eq(org))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(OrganizationDependants {
            hospitals: counted(hospitals),
            departments: counted(departments),
            users: counted(users),
        })
    }

    async fn delete(&self, id: OrganizationId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(organizations::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected(removed) > 0)
    }
}
