use async_trait::async_trait;
use sqlx::postgres::PgDatabaseError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::User;
use crate::infrastructure::user_store::{UserStore, UserStoreError};

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a unique-constraint violation on `users_email_key` into the
/// domain-visible duplicate error; everything else stays a database error.
fn map_insert_error(e: sqlx::Error, email: &str) -> UserStoreError {
    if let Some(db_err) = e.as_database_error() {
        if let Some(pg_err) = db_err.try_downcast_ref::<PgDatabaseError>() {
            if pg_err.code() == "23505" && pg_err.constraint() == Some("users_email_key") {
                return UserStoreError::EmailExists(email.to_string());
            }
        }
    }
    UserStoreError::Database(e)
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert(&self, user: &User) -> Result<(), UserStoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, photo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.photo)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &user.email))?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2, password_hash = $3, photo = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.photo)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &user.email))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::NotFound(user.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserStoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, photo, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(UserStoreError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, photo, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(UserStoreError::Database)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserStoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, photo, created_at, updated_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(UserStoreError::Database)
    }

    async fn delete_all(&self) -> Result<u64, UserStoreError> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(UserStoreError::Database)?;

        Ok(result.rows_affected())
    }
}
