//! 알림 릴레이의 공통 에러 타입.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 값 검증 실패
    #[error("설정 에러: {0}")]
    Config(String),

    /// 설정 파일/환경 변수 로드 실패
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),

    /// 로깅 초기화 실패
    #[error("로깅 초기화 실패: {0}")]
    Logging(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// 설정 에러를 생성합니다.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
