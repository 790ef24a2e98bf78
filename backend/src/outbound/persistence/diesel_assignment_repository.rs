//! PostgreSQL-backed `AssignmentRepository`.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AssignmentRepository, RepositoryError};
use crate::domain::{
    Assignment, AssignmentFilter, AssignmentId, AssignmentLink, LinkColumns, OrganizationId,
};

use super::diesel_error_mapping::{affected, map_diesel_error, map_pool_error};
use super::models::{AssignmentRow, rows_into};
use super::pool::DbPool;
use super::schema::assignments;

type BoxedAssignments<'a> = assignments::BoxedQuery<'a, Pg, assignments::SqlType>;

/// Diesel-backed implementation of the `AssignmentRepository` port.
#[derive(Clone)]
pub struct DieselAssignmentRepository {
    pool: DbPool,
}

impl DieselAssignmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Narrow `query` to rows whose endpoint columns equal the populated ones.
fn filter_endpoints<'a>(
    mut query: BoxedAssignments<'a>,
    columns: LinkColumns,
) -> BoxedAssignments<'a> {
    if let Some(id) = columns.department_id {
        query = query.filter(assignments::department_id.eq(*id.as_uuid()));
    }
    if let Some(id) = columns.location_id {
        query = query.filter(assignments::location_id.eq(*id.as_uuid()));
    }
    if let Some(id) = columns.team_id {
        query = query.filter(assignments::team_id.eq(*id.as_uuid()));
    }
    if let Some(id) = columns.user_id {
        query = query.filter(assignments::user_id.eq(*id.as_uuid()));
    }
    query
}

fn filtered(org_id: OrganizationId, filter: &AssignmentFilter) -> BoxedAssignments<'static> {
    let mut query = assignments::table
        .filter(assignments::org_id.eq(*org_id.as_uuid()))
        .into_boxed();
    if let Some(kind) = filter.kind {
        query = query.filter(assignments::kind.eq(kind.as_str()));
    }
    query = filter_endpoints(
        query,
        LinkColumns {
            department_id: filter.department_id,
            location_id: filter.location_id,
            team_id: filter.team_id,
            user_id: filter.user_id,
        },
    );
    if let Some(day) = filter.active_on {
        query = query.filter(assignments::start_date.le(day)).filter(
            assignments::end_date
                .is_null()
                .or(assignments::end_date.ge(day)),
        );
    }
    if !filter.include_inactive {
        query = query.filter(assignments::active.eq(true));
    }
    query
}

#[async_trait]
impl AssignmentRepository for DieselAssignmentRepository {
    async fn insert(&self, assignment: &Assignment) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(assignments::table)
            .values(AssignmentRow::from(assignment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, assignment: &Assignment) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = AssignmentRow::from(assignment);
        diesel::update(assignments::table.find(row.id))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: AssignmentId,
    ) -> Result<Option<Assignment>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AssignmentRow> = assignments::table
            .filter(assignments::id.eq(id.as_uuid()))
            .filter(assignments::org_id.eq(org_id.as_uuid()))
            .select(AssignmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Assignment::try_from).transpose()
    }

    async fn list(
        &self,
        org_id: OrganizationId,
        filter: &AssignmentFilter,
    ) -> Result<Vec<Assignment>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AssignmentRow> = filtered(org_id, filter)
            .select(AssignmentRow::as_select())
            .order_by((assignments::start_date, assignments::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_into(rows)
    }

    async fn list_for_link(
        &self,
        link: &AssignmentLink,
    ) -> Result<Vec<Assignment>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = assignments::table
            .filter(assignments::kind.eq(link.kind().as_str()))
            .into_boxed();
        let rows: Vec<AssignmentRow> = filter_endpoints(query, link.columns())
            .select(AssignmentRow::as_select())
            .order_by(assignments::start_date)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_into(rows)
    }

    async fn delete(&self, id: AssignmentId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(assignments::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected(removed) > 0)
    }
}
