use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::response::{self, ErrorBody};
use crate::fetcher::FetchError;
use crate::quota::QuotaExceeded;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    QuotaExceeded(#[from] QuotaExceeded),

    #[error("URL parameter is required")]
    MissingUrl,

    #[error(transparent)]
    FetchError(#[from] FetchError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::MissingUrl => StatusCode::BAD_REQUEST,
            AppError::FetchError(FetchError::Status(code)) => StatusCode::from_u16(*code)
                .ok()
                .filter(|status| status.is_client_error() || status.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            AppError::FetchError(FetchError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::FetchError(FetchError::Transport(_) | FetchError::TooLarge(_)) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            AppError::QuotaExceeded(exceeded) => {
                ErrorBody::new("Request limit reached").retry_after(exceeded.retry_after_secs())
            }
            AppError::FetchError(FetchError::Status(code)) => {
                ErrorBody::new("Failed to fetch the website").status_code(*code)
            }
            AppError::FetchError(FetchError::Timeout(details)) => {
                ErrorBody::new("Timed out fetching website").details(details.clone())
            }
            AppError::FetchError(FetchError::Transport(details)) => {
                ErrorBody::new("Error fetching website").details(details.clone())
            }
            AppError::FetchError(err @ FetchError::TooLarge(_)) => {
                ErrorBody::new("Error fetching website").details(err.to_string())
            }
            other => ErrorBody::new(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = response::error(self.status_code(), self.body()).into_response();

        if let AppError::QuotaExceeded(exceeded) = &self {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(exceeded.retry_after_secs()),
            );
        }

        response
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn upstream_error_status_is_propagated() {
        let err = AppError::from(FetchError::Status(503));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn upstream_non_error_status_becomes_bad_gateway() {
        let err = AppError::from(FetchError::Status(204));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn quota_rejection_sets_retry_after() {
        let err = AppError::from(QuotaExceeded {
            retry_after: Duration::from_millis(1500),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
    }

    #[test]
    fn oversized_body_is_bad_gateway() {
        let err = AppError::from(FetchError::TooLarge(1024));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_url_is_bad_request() {
        assert_eq!(AppError::MissingUrl.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MissingUrl.to_string(), "URL parameter is required");
    }
}
