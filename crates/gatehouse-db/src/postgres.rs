use std::time::Duration;

use async_trait::async_trait;
use gatehouse_models::{NewUser, UserFilter, UserRecord, UserView};
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::repository::{HealthReport, UserRepository};

const RECORD_COLUMNS: &str =
    "id::text AS id, email, password_hash, role, is_active, created_at, updated_at";

/// Postgres-backed identity repository. Cheap to clone; clones share the pool.
#[derive(Clone, Debug)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Ids are UUIDs in storage; anything else cannot name a row.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let sql = format!("SELECT {RECORD_COLUMNS} FROM users WHERE id = $1");
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM users WHERE email = $1");
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    #[instrument(skip(self, user), fields(user.email = %user.email, user.role = %user.role))]
    async fn insert(&self, user: NewUser) -> Result<UserRecord, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, role, is_active) \
             VALUES ($1, $2, $3, $4) RETURNING {RECORD_COLUMNS}"
        );
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(user.is_active)
            .fetch_one(&self.pool)
            .await?;
        debug!(user.id = %record.id, "User inserted");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn select_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserView>, RepositoryError> {
        let users = sqlx::query_as::<_, UserView>(
            r#"SELECT id::text AS id, email, is_active, role
               FROM users
               WHERE ($1 OR is_active) AND email ILIKE $2
               ORDER BY email, id
               LIMIT $3 OFFSET $4"#,
        )
        .bind(filter.include_inactive)
        .bind(filter.like_pattern())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn count_users(&self, filter: &UserFilter) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE ($1 OR is_active) AND email ILIKE $2",
        )
        .bind(filter.include_inactive)
        .bind(filter.like_pattern())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn update_email(&self, id: &str, email: &str) -> Result<UserRecord, RepositoryError> {
        let id = parse_id(id).ok_or(RepositoryError::NotFound)?;
        let sql = format!(
            "UPDATE users SET email = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {RECORD_COLUMNS}"
        );
        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), RepositoryError> {
        let id = parse_id(id).ok_or(RepositoryError::NotFound)?;
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: &str, is_active: bool) -> Result<(), RepositoryError> {
        let id = parse_id(id).ok_or(RepositoryError::NotFound)?;
        let result =
            sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(is_active)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let id = parse_id(id).ok_or(RepositoryError::NotFound)?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn health(&self) -> HealthReport {
        let ping = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool);
        let report = match tokio::time::timeout(Duration::from_secs(1), ping).await {
            Ok(Ok(_)) => HealthReport::up("It's healthy"),
            Ok(Err(e)) => {
                warn!(error = %e, "Database health check failed");
                HealthReport::down("database unreachable")
            }
            Err(_) => {
                warn!("Database health check timed out");
                HealthReport::down("database health check timed out")
            }
        };
        report.with_pool_stats(
            self.pool.size(),
            u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX),
            self.pool.options().get_max_connections(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert!(parse_id("1f0c7a52-6a9e-4d3e-8f55-2a3c1b9d7e10").is_some());
        assert!(parse_id("u1").is_none());
        assert!(parse_id("").is_none());
    }
}
