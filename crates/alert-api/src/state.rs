//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 상태는 시작 시 한 번 만들어지고 이후 변경되지 않으므로 잠금이 필요 없습니다.

use std::sync::Arc;
use std::time::Duration;

use alert_notification::MessageSender;

/// 웹훅 요청당 기본 전달 타임아웃.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 메시지 전송기 (운영: 텔레그램 클라이언트, 테스트: 스텁)
    pub sender: Arc<dyn MessageSender>,

    /// 전송 호출에 적용되는 타임아웃
    pub delivery_timeout: Duration,

    /// 서버 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self {
            sender,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 전달 타임아웃을 설정합니다.
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sender", &self.sender.name())
            .field("delivery_timeout", &self.delivery_timeout)
            .field("version", &self.version)
            .finish()
    }
}
