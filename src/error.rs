use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("access token rejected: {0}")]
    Forbidden(&'static str),

    #[error("profile not found or disabled")]
    ProfileNotFound,

    #[error("no subscription converter backend configured")]
    Unconfigured,

    #[error("upstream converter failure: {0}")]
    Upstream(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ProfileNotFound => StatusCode::NOT_FOUND,
            AppError::Unconfigured | AppError::Storage(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Upstream(_) | AppError::Network(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, self);
        } else {
            tracing::info!("Request rejected with {}: {}", status, self);
        }
        (status, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_error_taxonomy() {
        assert_eq!(
            AppError::Forbidden("direct token mismatch").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::ProfileNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Unconfigured.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Upstream("converter returned 500".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
