use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }

    /// Translate SeaORM errors; foreign-key violations become the
    /// integrity-violation kind, everything else a plain database error.
    pub fn from_db(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(msg)) => {
                Self::IntegrityViolation(msg)
            }
            _ => Self::Db(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;

    #[test]
    fn not_found_names_the_entity() {
        let e = ServiceError::not_found("movie");
        assert_eq!(e.to_string(), "not found: movie not found");
    }

    #[test]
    fn custom_db_errors_stay_db_errors() {
        let e = ServiceError::from_db(sea_orm::DbErr::Custom("boom".into()));
        assert!(matches!(e, ServiceError::Db(_)));
    }
}
