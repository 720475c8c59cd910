//! # Alert Core
//!
//! 알림 릴레이 전반에서 공유되는 기반 모듈.
//!
//! - [`config`]: 설정 로드 및 검증
//! - [`logging`]: tracing 기반 로깅 초기화
//! - [`error`]: 공통 에러 타입

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AppConfig, DeliveryConfig, ServerConfig, TelegramConfig};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, LogConfig, LogFormat};
