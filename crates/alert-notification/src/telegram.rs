//! 텔레그램 메시지 전송 클라이언트.
//!
//! Telegram Bot API의 `sendMessage`를 통해 고정된 채팅으로 텍스트를 전송합니다.
//! 응답은 HTTP 상태 코드로만 판단하며 본문은 해석하지 않습니다.

use std::fmt;
use std::time::Duration;

use alert_core::config::{TelegramConfig, DEFAULT_TELEGRAM_API_URL};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{MessageSender, NotificationError, NotificationResult};

/// HTTP 호출당 기본 타임아웃.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `sendMessage` 요청 본문.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
    disable_web_page_preview: bool,
}

/// 텔레그램 Bot API 클라이언트.
///
/// 내부 `reqwest::Client`는 연결 풀을 공유하므로 여러 요청에서 동시에 사용해도 안전합니다.
pub struct TelegramClient {
    token: String,
    chat_id: String,
    api_base_url: Url,
    client: reqwest::Client,
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// 리다이렉트를 따라가지 않는 HTTP 클라이언트. 3xx 응답은 그대로 실패로 판정된다.
fn build_http_client(timeout: Duration) -> NotificationResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(NotificationError::HttpClient)
}

impl TelegramClient {
    /// 새 텔레그램 클라이언트를 생성합니다.
    ///
    /// 토큰이나 채팅 ID가 비어 있으면 에러를 반환합니다.
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> NotificationResult<Self> {
        let token = token.into();
        let chat_id = chat_id.into();

        if token.is_empty() {
            return Err(NotificationError::MissingToken);
        }
        if chat_id.is_empty() {
            return Err(NotificationError::MissingChatId);
        }

        let api_base_url = Url::parse(DEFAULT_TELEGRAM_API_URL)
            .map_err(|e| NotificationError::InvalidBaseUrl(e.to_string()))?;

        Ok(Self {
            token,
            chat_id,
            api_base_url,
            client: build_http_client(DEFAULT_REQUEST_TIMEOUT)?,
        })
    }

    /// 설정 섹션에서 클라이언트를 생성합니다.
    pub fn from_config(config: &TelegramConfig) -> NotificationResult<Self> {
        let client = build_http_client(config.request_timeout())?;

        Self::new(config.bot_token(), config.chat_id.clone())?
            .with_http_client(client)
            .with_base_url(&config.api_base_url)
    }

    /// 기본 HTTP 클라이언트를 교체합니다.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// API 기본 주소를 교체합니다.
    ///
    /// 빈 문자열은 무시합니다. 경로 접두사(`http://proxy/tg`)는 유지됩니다.
    pub fn with_base_url(mut self, base_url: &str) -> NotificationResult<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Ok(self);
        }

        let parsed = Url::parse(base_url)
            .map_err(|e| NotificationError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NotificationError::InvalidBaseUrl(format!(
                "{base_url}: unsupported scheme"
            )));
        }

        self.api_base_url = parsed;
        Ok(self)
    }

    /// 메시지를 보낼 채팅 ID.
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// `{base}/bot{token}/sendMessage` 엔드포인트를 만듭니다.
    fn endpoint(&self) -> NotificationResult<Url> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                NotificationError::UrlBuild(format!(
                    "{} cannot be used as a base",
                    self.api_base_url
                ))
            })?
            .pop_if_empty()
            .push(&format!("bot{}", self.token))
            .push("sendMessage");
        Ok(url)
    }

    /// 설정된 채팅으로 텍스트를 전송합니다.
    ///
    /// 빈 텍스트는 네트워크 호출 없이 거부합니다.
    /// 2xx 이외의 모든 상태 코드(3xx 포함)는 실패로 처리합니다.
    pub async fn send_message(&self, text: &str) -> NotificationResult<()> {
        if text.is_empty() {
            return Err(NotificationError::EmptyMessage);
        }

        let endpoint = self.endpoint()?;

        let payload = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: None,
            disable_web_page_preview: true,
        };
        let body = serde_json::to_vec(&payload)?;

        let request = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .build()
            .map_err(NotificationError::RequestBuild)?;

        debug!(chat_id = %self.chat_id, "Sending Telegram message");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(NotificationError::Network)?;

        let status = response.status();

        // 연결 재사용을 위해 성공/실패와 관계없이 본문을 끝까지 읽는다
        let drained = response.bytes().await.map(|b| b.len()).unwrap_or(0);

        if !status.is_success() {
            warn!(%status, body_len = drained, "Telegram API returned non-success status");
            return Err(NotificationError::UnexpectedStatus(status));
        }

        debug!(%status, "Telegram message sent");
        Ok(())
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_text(&self, text: &str) -> NotificationResult<()> {
        self.send_message(text).await
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
