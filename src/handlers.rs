// region:    --- Imports
use crate::bidding::commands::handle_submit_bid;
use crate::contact;
use crate::error::ServiceError;
use crate::http::Envelope;
use crate::query::handlers::read_bids;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

// endregion: --- Imports

/// GET 작업 선택자
#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
}

// 결과 -> 봉투
fn respond<T: Serialize>(result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(payload) => Envelope::ok(payload).into_response(),
        Err(e) => e.into_response(),
    }
}

// region:    --- Command Handlers

/// 입찰 접수 (POST)
/// Content-Type과 무관하게 본문을 JSON으로 해석한다.
pub async fn handle_submit(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    info!("{:<12} --> 입찰 접수 요청", "Handler");
    let result = match body {
        Ok(body) => handle_submit_bid(&body, &*state.ledger, &state.policy).await,
        Err(rejection) => Err(ServiceError::MalformedInput(rejection.body_text())),
    };
    respond(result)
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// GET ?action=...
pub async fn handle_get(
    State(state): State<AppState>,
    query: Result<Query<ActionQuery>, QueryRejection>,
) -> Response {
    let action = query.ok().and_then(|Query(q)| q.action);
    info!("{:<12} --> GET 요청 action: {:?}", "Handler", action);

    match action.as_deref() {
        Some("read") => respond(read_bids(&*state.ledger, &state.policy).await),
        Some("contact") => respond(contact_phone(&state)),
        _ => ServiceError::UnsupportedAction.into_response(),
    }
}

fn contact_phone(state: &AppState) -> Result<serde_json::Value, ServiceError> {
    let phone = state
        .contact_phone
        .as_deref()
        .ok_or(ServiceError::ContactUnavailable)?;
    Ok(json!({ "phone": contact::obfuscate(phone) }))
}

// endregion: --- Query Handlers

// region:    --- Transport Handlers

/// 프리플라이트: 빈 본문, CORS 헤더만
pub async fn handle_preflight() -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, "text/plain")], "").into_response()
}

/// 지원하지 않는 메서드도 HTTP 200 + 실패 봉투
pub async fn handle_unsupported_method(method: Method) -> Response {
    ServiceError::UnsupportedMethod(method.to_string()).into_response()
}

/// 그 밖의 모든 경로 (배포 경로가 달라도 같은 계약으로 처리)
pub async fn handle_fallback(
    method: Method,
    state: State<AppState>,
    query: Result<Query<ActionQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::GET || method == Method::HEAD {
        handle_get(state, query).await
    } else if method == Method::POST {
        handle_submit(state, body).await
    } else if method == Method::OPTIONS {
        handle_preflight().await
    } else {
        handle_unsupported_method(method).await
    }
}

// endregion: --- Transport Handlers
