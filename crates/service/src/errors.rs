use common::pagination::PaginationError;
use models::db::{constraint_violation, ConstraintViolation};
use models::errors::ModelError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self { Self::InvalidArgument(msg.into()) }

    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn internal(err: impl std::fmt::Display) -> Self { Self::Internal(err.to_string()) }

    /// Message without the variant prefix, used as the `detail` of error bodies.
    pub fn detail(&self) -> &str {
        match self {
            Self::InvalidArgument(m) | Self::NotFound(m) | Self::Conflict(m) | Self::Internal(m) => m,
        }
    }

    /// Map a failed INSERT/UPDATE: unique violations become `Conflict`,
    /// foreign-key violations `InvalidArgument`, anything else `Internal`.
    pub fn from_write(err: DbErr, conflict: &str, foreign_key: &str) -> Self {
        match constraint_violation(&err) {
            Some(ConstraintViolation::Unique(_)) => Self::Conflict(conflict.to_string()),
            Some(ConstraintViolation::ForeignKey(_)) => Self::InvalidArgument(foreign_key.to_string()),
            None => Self::internal(err),
        }
    }

    /// Map a failed write on a table without foreign keys: only unique
    /// violations are a client problem.
    pub fn from_unique(err: DbErr, conflict: &str) -> Self {
        match constraint_violation(&err) {
            Some(ConstraintViolation::Unique(_)) => Self::Conflict(conflict.to_string()),
            _ => Self::internal(err),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self { Self::internal(err) }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(m) => Self::InvalidArgument(m),
            ModelError::Db(m) => Self::Internal(m),
        }
    }
}

impl From<PaginationError> for ServiceError {
    fn from(err: PaginationError) -> Self { Self::InvalidArgument(err.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_strips_prefix() {
        let e = ServiceError::not_found("Collection");
        assert_eq!(e.detail(), "Collection not found");
        assert_eq!(e.to_string(), "not found: Collection not found");
    }

    #[test]
    fn unclassified_db_errors_are_internal() {
        let e = ServiceError::from_write(DbErr::Custom("boom".into()), "dup", "fk");
        assert!(matches!(e, ServiceError::Internal(ref m) if m.contains("boom")));
        let e = ServiceError::from_unique(DbErr::Custom("boom".into()), "dup");
        assert!(matches!(e, ServiceError::Internal(ref m) if m.contains("boom")));
    }

    #[test]
    fn model_validation_maps_to_invalid_argument() {
        let e: ServiceError = ModelError::invalid("bad").into();
        assert!(matches!(e, ServiceError::InvalidArgument(ref m) if m == "bad"));
        let e: ServiceError = PaginationError::Limit.into();
        assert!(matches!(e, ServiceError::InvalidArgument(_)));
    }
}
