//! 웹훅 수신 endpoint.
//!
//! 차트 서비스 알림을 받아 검증하고, 포맷한 텍스트를 메신저로 전달합니다.
//! 요청마다 전송기를 최대 한 번 호출하며 실패해도 재시도하지 않습니다.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::alert::AlertPayload;
use crate::error::{api_error, ApiError, ApiResult};
use crate::state::AppState;

/// 웹훅 성공 응답.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: String,
}

impl WebhookResponse {
    /// `{"status":"ok"}`
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// 알림 수신.
///
/// `POST /webhook`
///
/// | 결과 | 상태 코드 |
/// |------|-----------|
/// | 전달 성공 | 200 `{"status":"ok"}` |
/// | JSON 디코딩 실패, 빈 message | 400 |
/// | 전달 실패/타임아웃 | 502 |
pub async fn receive_alert(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let payload = AlertPayload::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Rejected undecodable alert payload");
        api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_PAYLOAD",
            "invalid json payload",
        )
    })?;

    payload.validate().map_err(|e| {
        debug!(error = %e, "Rejected invalid alert payload");
        api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
    })?;

    let text = payload.format_message();
    deliver(&state, &text).await?;

    info!(
        ticker = %payload.ticker,
        interval = %payload.interval,
        "Alert delivered"
    );
    Ok(Json(WebhookResponse::ok()))
}

/// 전달 타임아웃 안에서 전송기를 호출합니다.
///
/// 클라이언트 연결이 끊기면 핸들러 future와 함께 전송 future도 drop되어
/// 진행 중인 HTTP 호출이 중단됩니다.
async fn deliver(state: &AppState, text: &str) -> Result<(), ApiError> {
    match tokio::time::timeout(state.delivery_timeout, state.sender.send_text(text)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!(sender = state.sender.name(), error = %e, "Alert delivery failed");
            Err(delivery_failed())
        }
        Err(_) => {
            error!(
                sender = state.sender.name(),
                timeout_ms = state.delivery_timeout.as_millis() as u64,
                "Alert delivery timed out"
            );
            Err(delivery_failed())
        }
    }
}

fn delivery_failed() -> ApiError {
    api_error(
        StatusCode::BAD_GATEWAY,
        "DELIVERY_FAILED",
        "failed to deliver alert",
    )
}

/// POST 이외의 메서드.
pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    debug!(%method, "Rejected webhook request method");
    let (status, body) = api_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_ALLOWED",
        "method not allowed",
    );
    (status, [(header::ALLOW, "POST")], body)
}
