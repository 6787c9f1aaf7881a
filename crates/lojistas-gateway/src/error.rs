use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use lojistas_core::AppError;
use serde::Serialize;
use std::fmt;

/// Body of a rejected request (400).
#[derive(Serialize)]
pub struct ValidationBody {
    pub error: String,
}

/// Body of a failed search (5xx or provider status).
#[derive(Serialize)]
pub struct FailureBody {
    pub error: String,
    pub details: String,
    pub timestamp: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Request carried no usable category.
    MissingCategory,

    /// The provider call or the grouping failed.
    SearchFailed(AppError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingCategory => write!(f, "Category is required"),
            ApiError::SearchFailed(e) => write!(f, "Failed to search sellers: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::SearchFailed(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingCategory => (
                StatusCode::BAD_REQUEST,
                Json(ValidationBody {
                    error: "Category is required".to_string(),
                }),
            )
                .into_response(),
            ApiError::SearchFailed(err) => {
                tracing::error!("Seller extraction failed: {}", err);

                let status = StatusCode::from_u16(err.upstream_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let details = match &err {
                    AppError::ProviderError { message, .. } => message.clone(),
                    other => other.to_string(),
                };

                (
                    status,
                    Json(FailureBody {
                        error: "Failed to search sellers".to_string(),
                        details,
                        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    }),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_category_status() {
        let response = ApiError::MissingCategory.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_status_echoed() {
        let err = ApiError::from(AppError::ProviderError {
            status: Some(401),
            message: "Invalid API key.".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_other_failures_are_500() {
        let err = ApiError::from(AppError::NoListings(None));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
