use gatehouse_core::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("email already existed")]
    Conflict,
    #[error("database operation timed out")]
    Timeout,
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::PoolTimedOut => RepositoryError::Timeout,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict
            }
            other => RepositoryError::Database(other),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::not_found(err),
            RepositoryError::Conflict => AppError::conflict(err.to_string()),
            RepositoryError::Timeout => AppError::timeout(),
            RepositoryError::Database(_) => AppError::database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_error_classification() {
        assert!(matches!(
            RepositoryError::from(sqlx::Error::RowNotFound),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            RepositoryError::from(sqlx::Error::PoolTimedOut),
            RepositoryError::Timeout
        ));
        assert!(matches!(
            RepositoryError::from(sqlx::Error::Protocol("boom".to_string())),
            RepositoryError::Database(_)
        ));
    }

    #[test]
    fn test_app_error_mapping() {
        assert_eq!(AppError::from(RepositoryError::NotFound).status.as_u16(), 404);
        assert_eq!(AppError::from(RepositoryError::Conflict).status.as_u16(), 409);
        assert_eq!(AppError::from(RepositoryError::Timeout).status.as_u16(), 504);

        let err = AppError::from(RepositoryError::Database(sqlx::Error::Protocol(
            "relation does not exist".to_string(),
        )));
        assert_eq!(err.status.as_u16(), 500);
        assert_eq!(err.public_message(), "internal server error");
    }
}
