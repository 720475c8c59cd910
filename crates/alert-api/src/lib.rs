//! 차트 알림 웹훅 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 웹훅 수신 endpoint
//! - 페이로드 검증 및 메시지 포맷
//! - 헬스 체크 endpoint
//!
//! # 모듈 구성
//!
//! - [`alert`]: 알림 페이로드 디코딩, 검증, 포맷
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: HTTP 엔드포인트와 라우터
//! - [`error`]: JSON 에러 응답

pub mod alert;
pub mod error;
pub mod routes;
pub mod state;

pub use alert::{AlertPayload, AlertValidationError};
pub use error::{ApiErrorResponse, ApiResult};
pub use routes::create_router;
pub use state::AppState;
