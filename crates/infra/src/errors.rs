//! Conversions from external infrastructure errors into domain errors.

use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use studyflow_domain::StudyflowError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub StudyflowError);

impl From<InfraError> for StudyflowError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<StudyflowError> for InfraError {
    fn from(value: StudyflowError) -> Self {
        Self(value)
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        let mapped = match value {
            SqlError::QueryReturnedNoRows => {
                StudyflowError::NotFound("no rows returned by query".into())
            }
            SqlError::FromSqlConversionFailure(_, _, cause) => {
                StudyflowError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            SqlError::InvalidColumnType(_, _, ty) => {
                StudyflowError::Database(format!("invalid column type: {ty}"))
            }
            other => StudyflowError::Database(other.to_string()),
        };
        Self(mapped)
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        Self(StudyflowError::Database(format!("connection pool error: {value}")))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        let mapped = if value.is_timeout() {
            StudyflowError::Network("HTTP request timed out".into())
        } else if value.is_connect() {
            StudyflowError::Network("HTTP connection failure".into())
        } else {
            StudyflowError::Network(value.to_string())
        };
        Self(mapped)
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(StudyflowError::InvalidInput(format!("JSON error: {value}")))
    }
}
