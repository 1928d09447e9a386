//! MySQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Each operation checks out the shared connection and runs one
//! parameterised statement. `create` also reads `LAST_INSERT_ID()` while it
//! still holds the connection, since the value is scoped to the session.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Unsigned};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserDraft, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::{CREATE_USERS_TABLE, users};

diesel::define_sql_function! {
    /// MySQL's per-session last generated auto-increment value.
    fn last_insert_id() -> Unsigned<BigInt>;
}

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`UserPersistenceError`] when the connection is unavailable or
    /// the DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::sql_query(CREATE_USERS_TABLE)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!("users table ensured");
        Ok(())
    }
}

fn generated_id(raw: u64) -> Result<UserId, UserPersistenceError> {
    i32::try_from(raw)
        .map(UserId::new)
        .map_err(|_| UserPersistenceError::query(format!("generated id {raw} exceeds INT range")))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, draft: &UserDraft) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from(draft))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let raw: u64 = diesel::select(last_insert_id())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(draft.clone().into_user(generated_id(raw)?))
    }

    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(users::table.find(id.get()))
            .set(UserUpdate::from(draft))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(%id, affected, "user update executed");
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(%id, affected, "user delete executed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the SQL this adapter generates.
    use super::*;
    use diesel::debug_query;
    use diesel::mysql::Mysql;
    use rstest::rstest;

    #[rstest]
    fn list_selects_all_columns_without_ordering() {
        let query = users::table.select(UserRow::as_select());
        let sql = debug_query::<Mysql, _>(&query).to_string();
        assert!(sql.starts_with("SELECT `users`.`id`, `users`.`name`, `users`.`email` FROM `users`"));
        assert!(!sql.contains("ORDER BY"));
    }

    #[rstest]
    fn insert_binds_values() {
        let draft = UserDraft::new(Some("Ana".into()), Some("ana@x.com".into()));
        let query = diesel::insert_into(users::table).values(NewUserRow::from(&draft));
        let sql = debug_query::<Mysql, _>(&query).to_string();
        assert!(sql.contains("INSERT INTO `users` (`name`, `email`) VALUES (?, ?)"));
    }

    #[rstest]
    fn update_writes_null_for_missing_fields() {
        let draft = UserDraft::new(Some("Ana Silva".into()), None);
        let query = diesel::update(users::table.find(1)).set(UserUpdate::from(&draft));
        let sql = debug_query::<Mysql, _>(&query).to_string();
        assert!(sql.contains("SET `name` = ?, `email` = ?"), "{sql}");
        assert!(sql.contains("WHERE (`users`.`id` = ?)"), "{sql}");
    }

    #[rstest]
    fn delete_filters_by_primary_key() {
        let query = diesel::delete(users::table.find(5));
        let sql = debug_query::<Mysql, _>(&query).to_string();
        assert!(sql.contains("DELETE FROM `users` WHERE (`users`.`id` = ?)"), "{sql}");
    }

    #[rstest]
    #[case(1, Some(1))]
    #[case(2_147_483_647, Some(i32::MAX))]
    #[case(2_147_483_648, None)]
    fn generated_ids_fit_int_column(#[case] raw: u64, #[case] expected: Option<i32>) {
        assert_eq!(generated_id(raw).ok().map(UserId::get), expected);
    }
}
