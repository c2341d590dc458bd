use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use finsight_agent::AdvisorError;
use finsight_auth::AuthError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Report not found")]
    ReportNotFound(String),

    #[error("Client not found")]
    ClientNotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    #[error("Persistence error: {0}")]
    Persist(#[from] finsight_persist::PersistError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::ReportNotFound(_) | ApiError::ClientNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::Auth(ref e) => match e {
                AuthError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                AuthError::NotAuthorized => (StatusCode::FORBIDDEN, e.to_string()),
                AuthError::InvalidPasscode | AuthError::InvalidSession => {
                    (StatusCode::UNAUTHORIZED, e.to_string())
                }
                AuthError::Mail(ref mail) => {
                    tracing::error!("Mail error: {}", mail);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to send passcode email".to_string(),
                    )
                }
                AuthError::Store(ref store) => {
                    tracing::error!("Auth storage error: {}", store);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
                }
            },
            ApiError::Advisor(ref e) => match e {
                AdvisorError::NotConfigured => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Language model is not configured".to_string(),
                ),
                AdvisorError::Llm(ref err) => {
                    tracing::error!("Language model error: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Processing error".to_string())
                }
                AdvisorError::Store(ref err) => {
                    tracing::error!("Advisor storage error: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
                }
            },
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
