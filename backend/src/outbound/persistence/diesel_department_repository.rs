//! PostgreSQL-backed `DepartmentRepository`.
//!
//! Deleting a department removes its teams and every assignment referencing
//! the department or those teams inside one transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{DepartmentRepository, RepositoryError};
use crate::domain::{CascadeReport, Department, DepartmentId, OrganizationId};

use super::diesel_error_mapping::{affected, map_diesel_error, map_pool_error};
use super::models::{DepartmentRow, rows_into};
use super::pool::DbPool;
use super::schema::{assignments, departments, teams};

/// Diesel-backed implementation of the `DepartmentRepository` port.
#[derive(Clone)]
pub struct DieselDepartmentRepository {
    pool: DbPool,
}

impl DieselDepartmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentRepository for DieselDepartmentRepository {
    async fn insert(&self, department: &Department) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(departments::table)
            .values(DepartmentRow::from(department))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, department: &Department) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = DepartmentRow::from(department);
        diesel::update(departments::table.find(row.id))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: DepartmentId,
    ) -> Result<Option<Department>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DepartmentRow> = departments::table
            .filter(departments::id.eq(id.as_uuid()))
            .filter(departments::org_id.eq(org_id.as_uuid()))
            .select(DepartmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Department::try_from).transpose()
    }

    async fn find_by_name_key(
        &self,
        org_id: OrganizationId,
        key: &str,
    ) -> Result<Option<Department>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DepartmentRow> = departments::table
            .filter(departments::org_id.eq(org_id.as_uuid()))
            .filter(departments::name_key.eq(key))
            .select(DepartmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Department::try_from).transpose()
    }

    async fn list(&self, org_id: OrganizationId) -> Result<Vec<Department>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DepartmentRow> = departments::table
            .filter(departments::org_id.eq(org_id.as_uuid()))
            .select(DepartmentRow::as_select())
            .order_by(departments::name_key)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_into(rows)
    }

    async fn delete_cascade(&self, id: DepartmentId) -> Result<CascadeReport, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let department = *id.as_uuid();
        conn.transaction(|conn| {
            async move {
                let team_ids: Vec<Uuid> = teams::table
                    .filter(teams::department_id.eq(department))
                    .select(teams::id)
                    .load(conn)
                    .await?;
                let removed_assignments = diesel::delete(
                    assignments::table.filter(
                        assignments::department_id
                            .eq(department)
                            .or(assignments::team_id.eq_any(team_ids)),
                    ),
                )
                .execute(conn)
                .await?;
                let removed_teams =
                    diesel::delete(teams::table.filter(teams::department_id.eq(department)))
                        .execute(conn)
                        .await?;
                diesel::delete(departments::table.find(department))
                    .execute(conn)
                    .await?;
                Ok(CascadeReport {
                    teams: affected(removed_teams),
                    assignments: affected(removed_assignments),
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
