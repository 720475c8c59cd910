//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `POST /webhook` - 차트 알림 수신 및 전달
//! - `GET /healthz` - 헬스 체크 (liveness)

pub mod health;
pub mod webhook;

pub use health::health_check;
pub use webhook::{method_not_allowed, receive_alert, WebhookResponse};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// 전체 라우터 생성.
///
/// `request_timeout`은 본문 수신부터 응답까지 요청 전체에 적용되며,
/// 초과 시 408을 반환합니다. 전달 타임아웃보다 길어야 전달 실패가 502로 응답됩니다.
pub fn create_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .route(
            "/webhook",
            post(receive_alert).fallback(method_not_allowed),
        )
        .route("/healthz", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}
