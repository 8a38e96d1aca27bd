use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// Service error carried to the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::IntegrityViolation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Db(_) | ServiceError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.0.to_string();
        if status.is_server_error() {
            error!(error = %msg, "request failed");
        }
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(ApiError(ServiceError::not_found("movie")).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn integrity_violation_maps_to_400() {
        assert_eq!(
            ApiError(ServiceError::IntegrityViolation("fk".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unauthorized_maps_to_401() {
        assert_eq!(
            ApiError(ServiceError::Unauthorized("who".into())).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn validation_maps_to_422() {
        assert_eq!(
            ApiError(ServiceError::Validation("bad".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn db_and_model_errors_map_to_500() {
        assert_eq!(
            ApiError(ServiceError::Db("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError(ServiceError::Model(ModelError::Db("boom".into()))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
