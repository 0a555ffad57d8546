use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hultagram_types::ErrorResponse;

use crate::services::ServiceError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, details) = match self {
            ApiError::NotFound(msg) => ("Not Found", msg),
            ApiError::BadRequest(msg) => ("Bad Request", msg),
            ApiError::Unauthorized(msg) => ("Unauthorized", msg),
            ApiError::Forbidden(msg) => ("Forbidden", msg),
            ApiError::Conflict(msg) => ("Conflict", msg),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: message.to_string(),
            details: Some(details),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::InvalidOperation(msg) => ApiError::BadRequest(msg),
            ServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            ServiceError::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Storage(e) => ApiError::InternalError(format!("{:#}", e)),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::not_found("Post"), StatusCode::NOT_FOUND),
            (ServiceError::validation("empty"), StatusCode::BAD_REQUEST),
            (ServiceError::InvalidOperation("self".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Forbidden("owner".into()), StatusCode::FORBIDDEN),
            (ServiceError::Unauthenticated("login".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Conflict("taken".into()), StatusCode::CONFLICT),
            (
                ServiceError::Storage(anyhow::anyhow!("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_not_found_message_names_the_entity() {
        match ApiError::from(ServiceError::not_found("Post")) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Post not found"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
