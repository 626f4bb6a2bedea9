use async_trait::async_trait;
use gatehouse_models::{NewUser, UserFilter, UserRecord, UserView};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::RepositoryError;

/// Identity repository contract.
///
/// Every mutation is a single repository-internal statement; callers never
/// read-modify-write through this trait. Ids are opaque strings, and an id
/// the backend cannot interpret behaves like a missing row.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;

    /// Fails with [`RepositoryError::Conflict`] when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<UserRecord, RepositoryError>;

    /// Up to `limit` rows matching `filter`, ordered by email then id.
    async fn select_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserView>, RepositoryError>;

    async fn count_users(&self, filter: &UserFilter) -> Result<i64, RepositoryError>;

    async fn update_email(&self, id: &str, email: &str) -> Result<UserRecord, RepositoryError>;

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), RepositoryError>;

    async fn update_status(&self, id: &str, is_active: bool) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    async fn health(&self) -> HealthReport;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_use: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

impl HealthReport {
    pub fn up(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Up,
            message: message.into(),
            open_connections: None,
            in_use: None,
            idle_connections: None,
            max_connections: None,
        }
    }

    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Down,
            ..Self::up(message)
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == HealthStatus::Up
    }

    /// Attaches pool statistics. A reachable pool that is running close to
    /// its limit keeps `up` but gets an advisory message.
    pub fn with_pool_stats(mut self, open: u32, idle: u32, max: u32) -> Self {
        let in_use = open.saturating_sub(idle);
        self.open_connections = Some(open);
        self.in_use = Some(in_use);
        self.idle_connections = Some(idle);
        self.max_connections = Some(max);

        if self.is_up() && max > 0 {
            if in_use >= max {
                self.message = "All database connections are in use, requests are waiting \
                                for a free connection."
                    .to_string();
            } else if u64::from(open) * 5 > u64::from(max) * 4 {
                self.message = "The database is experiencing heavy load.".to_string();
            }
        }
        self
    }
}
