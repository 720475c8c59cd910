//! 헬스 체크 endpoint.
//!
//! 로드밸런서나 오케스트레이션 시스템의 liveness probe용입니다.

use axum::{http::StatusCode, response::IntoResponse};

/// 간단한 헬스 체크.
///
/// GET /healthz
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
