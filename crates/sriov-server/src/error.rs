use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Invalid input (400)
    BadRequest(String),

    /// Validation failed (422)
    ValidationFailed(String),
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ValidationFailed(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };

        let body = Json(json!({
            "apiVersion": "v1",
            "kind": "Status",
            "status": "Failure",
            "message": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<sriov_core::SriovError> for ApiError {
    fn from(err: sriov_core::SriovError) -> Self {
        use sriov_core::SriovError;

        match err {
            SriovError::InvalidRequest { .. } => ApiError::BadRequest(err.to_string()),
            SriovError::InvalidQuantity { .. } => ApiError::ValidationFailed(err.to_string()),
        }
    }
}

impl From<sriov_extender::ExtenderError> for ApiError {
    fn from(err: sriov_extender::ExtenderError) -> Self {
        use sriov_extender::ExtenderError;

        match err {
            ExtenderError::CoreError(core) => ApiError::from(core),
            ExtenderError::InvalidConfig { .. } => ApiError::ValidationFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sriov_core::SriovError;

    #[test]
    fn test_status_codes() {
        let response = ApiError::BadRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::ValidationFailed("invalid".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_from_core_error() {
        let err = ApiError::from(SriovError::invalid_request("no pod name", "send the pod"));
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = ApiError::from(SriovError::invalid_quantity("many", "not a number"));
        assert!(matches!(err, ApiError::ValidationFailed(_)));
    }

    #[test]
    fn test_from_extender_error() {
        let err = ApiError::from(sriov_extender::ExtenderError::from(
            SriovError::invalid_request("node name is empty", "pass a node"),
        ));
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
