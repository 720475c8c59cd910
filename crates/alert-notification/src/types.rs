//! 메시지 전송 trait 및 에러 정의.

use async_trait::async_trait;
use reqwest::StatusCode;

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
///
/// 전송 단계(URL 생성, 직렬화, 요청 생성, 전송, 응답 상태)별로 구분됩니다.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("telegram: 봇 토큰이 필요합니다")]
    MissingToken,

    #[error("telegram: 채팅 ID가 필요합니다")]
    MissingChatId,

    #[error("telegram: 메시지가 비어 있습니다")]
    EmptyMessage,

    #[error("telegram: 잘못된 API 주소: {0}")]
    InvalidBaseUrl(String),

    #[error("telegram: HTTP 클라이언트 생성 실패: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("telegram: URL 생성 실패: {0}")]
    UrlBuild(String),

    #[error("telegram: 요청 직렬화 실패: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("telegram: 요청 생성 실패: {0}")]
    RequestBuild(#[source] reqwest::Error),

    #[error("telegram: 요청 전송 실패: {0}")]
    Network(#[source] reqwest::Error),

    #[error("telegram: 예상하지 못한 응답 상태 {0}")]
    UnexpectedStatus(StatusCode),
}

/// 텍스트 메시지 전송기 trait.
///
/// 웹훅 핸들러는 구체적인 클라이언트 대신 이 trait에만 의존합니다.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// 고정된 목적지로 텍스트를 전송합니다.
    async fn send_text(&self, text: &str) -> NotificationResult<()>;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display_includes_status_text() {
        let err = NotificationError::UnexpectedStatus(StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("502 Bad Gateway"));
    }
}
