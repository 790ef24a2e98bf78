//! PostgreSQL-backed `TeamRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{RepositoryError, TeamRepository};
use crate::domain::{DepartmentId, OrganizationId, Team, TeamId};

use super::diesel_error_mapping::{affected, map_diesel_error, map_pool_error};
use super::models::{TeamRow, rows_into};
use super::pool::DbPool;
use super::schema::{assignments, teams};

/// Diesel-backed implementation of the `TeamRepository` port.
#[derive(Clone)]
pub struct DieselTeamRepository {
    pool: DbPool,
}

impl DieselTeamRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for DieselTeamRepository {
    async fn insert(&self, team: &Team) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(teams::table)
            .values(TeamRow::from(team))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, team: &Team) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = TeamRow::from(team);
        diesel::update(teams::table.find(row.id))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: TeamId,
    ) -> Result<Option<Team>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TeamRow> = teams::table
            .filter(teams::id.eq(id.as_uuid()))
            .filter(teams::org_id.eq(org_id.as_uuid()))
            .select(TeamRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Team::try_from).transpose()
    }

    async fn find_by_name_key(
        &self,
        department_id: DepartmentId,
        key: &str,
    ) -> Result<Option<Team>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TeamRow> = teams::table
            .filter(teams::department_id.eq(department_id.as_uuid()))
            .filter(teams::name_key.eq(key))
            .select(TeamRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Team::try_from).transpose()
    }

    async fn list(
        &self,
        org_id: OrganizationId,
        department_id: Option<DepartmentId>,
    ) -> Result<Vec<Team>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = teams::table
            .filter(teams::org_id.eq(*org_id.as_uuid()))
            .select(TeamRow::as_select())
            .order_by(teams::name_key)
            .into_boxed();
        if let Some(department_id) = department_id {
            query = query.filter(teams::department_id.eq(*department_id.as_uuid()));
        }
        let rows: Vec<TeamRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_into(rows)
    }

    async fn delete_with_assignments(&self, id: TeamId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let team = *id.as_uuid();
        conn.transaction(|conn| {
            async move {
                let removed =
                    diesel::delete(assignments::table.filter(assignments::team_id.eq(team)))
                        .execute(conn)
                        .await?;
                diesel::delete(teams::table.find(team)).execute(conn).await?;
                Ok(affected(removed))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
