//! Mapping of failures to JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use torrentino_core::{OrchestratorError, SearchError, StoreError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors returned by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A required query parameter is absent or blank.
    MissingParameter(&'static str),
    /// The referenced item does not exist. Reported as a client error.
    NotFound(String),
    /// The component needed for this route is not configured.
    NotConfigured(&'static str),
    /// The search backend failed.
    Upstream(String),
    Internal(String),
}

impl ApiError {
    /// Unwrap a query parameter, treating blank values as missing.
    pub fn require(value: Option<String>, name: &'static str) -> Result<String, ApiError> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::MissingParameter(name))
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) | ApiError::NotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::MissingParameter(name) => format!("'{}' is required.", name),
            ApiError::NotFound(message) => message.clone(),
            ApiError::NotConfigured(component) => format!("{} not configured", component),
            ApiError::Upstream(message) => format!("Search failed: {}", message),
            ApiError::Internal(message) => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            error!(status = %status, error = %message, "Request failed");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        warn!(error = %e, "Search backend failed");
        ApiError::Upstream(e.to_string())
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(e: OrchestratorError) -> Self {
        match e {
            OrchestratorError::NotFound(_) => {
                ApiError::NotFound("Couldn't find torrent for id.".to_string())
            }
            OrchestratorError::InvalidArgument(_) => ApiError::MissingParameter("id"),
            OrchestratorError::Store(e) => e.into(),
            OrchestratorError::JobFailed(message) => ApiError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        assert!(matches!(
            ApiError::require(None, "query"),
            Err(ApiError::MissingParameter("query"))
        ));
        assert!(matches!(
            ApiError::require(Some("   ".to_string()), "query"),
            Err(ApiError::MissingParameter("query"))
        ));
        assert_eq!(
            ApiError::require(Some(" got ".to_string()), "query").unwrap(),
            "got"
        );
    }

    #[test]
    fn test_messages_and_status() {
        let err = ApiError::MissingParameter("id");
        assert_eq!(err.message(), "'id' is required.");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(OrchestratorError::NotFound("x".to_string()));
        assert_eq!(err.message(), "Couldn't find torrent for id.");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(StoreError::Database("disk full".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::from(SearchError::Timeout);
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
