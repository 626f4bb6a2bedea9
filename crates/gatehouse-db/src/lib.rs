//! # Gatehouse DB
//!
//! The identity repository: point lookups by id or email, single-statement
//! mutations, and the two read halves of a listing (select a page, count the
//! matches).
//!
//! - [`UserRepository`]: the contract the gateway depends on
//! - [`PgUserRepository`]: Postgres implementation over a shared [`PgPool`]
//! - `MemoryUserRepository`: in-process implementation with fault injection,
//!   available with the `test-utils` feature
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_db::{PgUserRepository, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&config.database).await?;
//! run_migrations(&pool).await?;
//! let repository = PgUserRepository::new(pool);
//! ```

pub mod error;
pub mod pool;
pub mod postgres;
pub mod repository;

#[cfg(feature = "test-utils")]
pub mod memory;

pub use error::RepositoryError;
pub use pool::{init_db_pool, run_migrations};
pub use postgres::PgUserRepository;
pub use repository::{HealthReport, HealthStatus, UserRepository};

#[cfg(feature = "test-utils")]
pub use memory::{MemoryUserRepository, Operation};

// Re-export PgPool for convenience
pub use sqlx::PgPool;
