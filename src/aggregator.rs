//! Concurrent page assembly for listings.
//!
//! A page needs two reads that share one predicate: the rows at
//! `offset..offset + limit` and the total number of matches. Both run
//! concurrently as halves of a single join:
//!
//! - the first failure from either half is returned and the other half is
//!   dropped, so nothing is ever partially merged
//! - when a deadline is given, the join races it and loses nothing but the
//!   in-flight queries
//!
//! The halves are not wrapped in a transaction. Under concurrent writes
//! `total_count` and `items` can disagree with each other; an unchanging
//! data set always yields `total_pages == ceil(total_count / limit)`.

use gatehouse_core::{AppError, PageRequest, PageResult};
use gatehouse_db::{RepositoryError, UserRepository};
use gatehouse_models::{UserFilter, UserView};
use thiserror::Error;
use tokio::time::{Instant, timeout_at};
use tracing::{instrument, warn};

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("listing deadline elapsed")]
    DeadlineElapsed,
    #[error("{query} query failed: {source}")]
    Query {
        query: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl From<AggregationError> for AppError {
    fn from(err: AggregationError) -> Self {
        match err {
            AggregationError::DeadlineElapsed
            | AggregationError::Query {
                source: RepositoryError::Timeout,
                ..
            } => AppError::timeout(),
            AggregationError::Query { .. } => AppError::internal(err),
        }
    }
}

#[instrument(skip(repository), fields(limit = page.limit, offset = page.offset))]
pub async fn aggregate_page(
    repository: &dyn UserRepository,
    page: &PageRequest,
    deadline: Option<Instant>,
) -> Result<PageResult<UserView>, AggregationError> {
    let filter = UserFilter::new(page.filter.as_str(), page.include_inactive);

    let select = async {
        repository
            .select_users(&filter, page.limit, page.offset)
            .await
            .map_err(|source| AggregationError::Query {
                query: "select",
                source,
            })
    };
    let count = async {
        repository
            .count_users(&filter)
            .await
            .map_err(|source| AggregationError::Query {
                query: "count",
                source,
            })
    };
    let joined = async { tokio::try_join!(select, count) };

    let result = match deadline {
        Some(deadline) => timeout_at(deadline, joined)
            .await
            .unwrap_or(Err(AggregationError::DeadlineElapsed)),
        None => joined.await,
    };

    let (items, total_count) = result.inspect_err(|e| warn!(error = %e, "Listing failed"))?;
    Ok(PageResult::new(items, total_count, page.limit))
}
