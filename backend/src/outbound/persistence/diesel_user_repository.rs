//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RepositoryError, UserRepository};
use crate::domain::{EmailAddress, OrganizationId, User, UserId};

use super::diesel_error_mapping::{affected, map_diesel_error, map_pool_error};
use super::models::{UserRow, rows_into};
use super::pool::DbPool;
use super::schema::{assignments, users};

diesel::define_sql_function! {
    /// SQL `lower()` for case-insensitive ordering.
    fn lower(value: Text) -> Text;
}

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(UserRow::from(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = UserRow::from(user);
        diesel::update(users::table.find(row.id))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_email(
        &self,
        org_id: OrganizationId,
        email: &EmailAddress,
    ) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::org_id.eq(org_id.as_uuid()))
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from).transpose()
    }

    async fn list(&self, org_id: OrganizationId) -> Result<Vec<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::org_id.eq(org_id.as_uuid()))
            .select(UserRow::as_select())
            .order_by((lower(users::display_name), users::email))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_into(rows)
    }

    async fn find_many(
        &self,
        org_id: OrganizationId,
        ids: &[UserId],
    ) -> Result<Vec<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = ids.iter().copied().map(Uuid::from).collect();
        let rows: Vec<UserRow> = users::table
            .filter(users::org_id.eq(org_id.as_uuid()))
            .filter(users::id.eq_any(ids))
            .select(UserRow::as_select())
            .order_by((lower(users::display_name), users::email))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_into(rows)
    }

    async fn delete_with_assignments(&self, id: UserId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = *id.as_uuid();
        conn.transaction(|conn| {
            async move {
                let removed =
                    diesel::delete(assignments::table.filter(assignments::user_id.eq(user)))
                        .execute(conn)
                        .await?;
                diesel::delete(users::table.find(user)).execute(conn).await?;
                Ok(affected(removed))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
