// region:    --- Imports
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
// endregion: --- Imports

// region:    --- Service Error
/// 서비스 경계에서 발생하는 모든 오류
/// 전송 계층(IntoResponse)에서만 응답 봉투로 변환된다.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid request body: {0}")]
    MalformedInput(String),

    #[error("Ledger unavailable: {0}")]
    Storage(String),

    #[error("Ledger header {found:?} does not match the configured schema {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Missing or unsupported action parameter")]
    UnsupportedAction,

    #[error("Contact details are not configured")]
    ContactUnavailable,

    #[error("Method {0} is not supported")]
    UnsupportedMethod(String),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Storage(e.to_string())
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        ServiceError::Storage(e.to_string())
    }
}

/// 애플리케이션 오류는 항상 HTTP 200 + success:false 봉투로 전달
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = match &self {
            ServiceError::UnsupportedAction => {
                warn!("{:<12} --> 지원하지 않는 action 요청", "Envelope");
                json!({
                    "success": false,
                    "error": self.to_string(),
                    "message": "Use GET ?action=read to retrieve bids",
                })
            }
            ServiceError::MalformedInput(_)
            | ServiceError::ContactUnavailable
            | ServiceError::UnsupportedMethod(_) => {
                warn!("{:<12} --> 요청 처리 실패: {}", "Envelope", self);
                json!({ "success": false, "error": self.to_string() })
            }
            ServiceError::Storage(_) | ServiceError::SchemaMismatch { .. } => {
                error!("{:<12} --> 원장 접근 실패: {}", "Envelope", self);
                json!({ "success": false, "error": self.to_string() })
            }
        };

        Json(body).into_response()
    }
}
// endregion: --- Service Error

// region:    --- Config Error
/// 시작 시점 설정 오류
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be set for the selected ledger backend")]
    Missing(&'static str),
}
// endregion: --- Config Error
