//! In-process [`UserRepository`] for tests.
//!
//! Besides storing rows it can be told to fail or stall specific operations,
//! which is how the listing short-circuit and the request deadline are
//! exercised without a database.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use gatehouse_models::{NewUser, UserFilter, UserRecord, UserView};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::repository::{HealthReport, UserRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FindById,
    FindByEmail,
    Insert,
    Select,
    Count,
    Update,
    Delete,
}

#[derive(Debug, Default)]
struct Faults {
    failing: Vec<Operation>,
    delays: Vec<(Operation, Duration)>,
    down: bool,
}

#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<UserRecord>>,
    faults: Mutex<Faults>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> MutexGuard<'_, Vec<UserRecord>> {
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes every call of `operation` fail with a database error.
    pub fn fail(&self, operation: Operation) {
        self.faults().failing.push(operation);
    }

    /// Makes every call of `operation` sleep for `delay` before running.
    pub fn delay(&self, operation: Operation, delay: Duration) {
        self.faults().delays.push((operation, delay));
    }

    pub fn set_down(&self, down: bool) {
        self.faults().down = down;
    }

    pub fn clear_faults(&self) {
        *self.faults() = Faults::default();
    }

    /// Inserts a record as-is, bypassing uniqueness checks.
    pub fn seed(&self, record: UserRecord) {
        self.users().push(record);
    }

    pub fn len(&self) -> usize {
        self.users().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users().is_empty()
    }

    async fn enter(&self, operation: Operation) -> Result<(), RepositoryError> {
        let (delay, fails) = {
            let faults = self.faults();
            let delay = faults
                .delays
                .iter()
                .find(|(op, _)| *op == operation)
                .map(|(_, d)| *d);
            (delay, faults.failing.contains(&operation))
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fails {
            return Err(RepositoryError::Database(sqlx::Error::Protocol(format!(
                "injected failure in {operation:?}"
            ))));
        }
        Ok(())
    }

    fn sorted_matches(&self, filter: &UserFilter) -> Vec<UserRecord> {
        let mut matches: Vec<UserRecord> = self
            .users()
            .iter()
            .filter(|u| filter.matches(&u.email, u.is_active))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.email.cmp(&b.email).then_with(|| a.id.cmp(&b.id)));
        matches
    }

    fn modify<F>(&self, id: &str, f: F) -> Result<UserRecord, RepositoryError>
    where
        F: FnOnce(&mut UserRecord),
    {
        let mut users = self.users();
        let record = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;
        f(record);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepositoryError> {
        self.enter(Operation::FindById).await?;
        Ok(self.users().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        self.enter(Operation::FindByEmail).await?;
        Ok(self.users().iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, RepositoryError> {
        self.enter(Operation::Insert).await?;
        let mut users = self.users();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: user.is_active,
            created_at: now,
            updated_at: now,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn select_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserView>, RepositoryError> {
        self.enter(Operation::Select).await?;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .sorted_matches(filter)
            .into_iter()
            .skip(skip)
            .take(take)
            .map(UserView::from)
            .collect())
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<i64, RepositoryError> {
        self.enter(Operation::Count).await?;
        let count = self
            .users()
            .iter()
            .filter(|u| filter.matches(&u.email, u.is_active))
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn update_email(&self, id: &str, email: &str) -> Result<UserRecord, RepositoryError> {
        self.enter(Operation::Update).await?;
        if self.users().iter().any(|u| u.email == email && u.id != id) {
            return Err(RepositoryError::Conflict);
        }
        self.modify(id, |u| u.email = email.to_string())
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), RepositoryError> {
        self.enter(Operation::Update).await?;
        self.modify(id, |u| u.password_hash = password_hash.to_string())
            .map(|_| ())
    }

    async fn update_status(&self, id: &str, is_active: bool) -> Result<(), RepositoryError> {
        self.enter(Operation::Update).await?;
        self.modify(id, |u| u.is_active = is_active).map(|_| ())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.enter(Operation::Delete).await?;
        let mut users = self.users();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn health(&self) -> HealthReport {
        if self.faults().down {
            HealthReport::down("memory repository marked down")
        } else {
            HealthReport::up("It's healthy")
        }
    }
}
