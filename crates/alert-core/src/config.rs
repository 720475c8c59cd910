//! 설정 관리.
//!
//! 기본값 → TOML 파일 → 환경 변수(`ALERT__섹션__키`) 순서로 덮어씁니다.
//! 설정은 프로세스 시작 시 한 번 로드되며 이후 변경되지 않습니다.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::error::{CoreError, CoreResult};
use crate::logging::LogConfig;

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "ALERT";

/// 텔레그램 Bot API 기본 주소.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 텔레그램 설정
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// 알림 전달 설정
    #[serde(default)]
    pub delivery: DeliveryConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LogConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 리스닝 주소 (`":8080"` 형식은 모든 인터페이스)
    pub addr: String,
    /// 요청 전체 처리 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// graceful shutdown 최대 대기 시간 (초)
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: ":8080".to_string(),
            request_timeout_secs: 30,
            shutdown_grace_secs: 5,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 또는 `:port` 형식이 아니면 `CoreError::Config`를 반환합니다.
    pub fn socket_addr(&self) -> CoreResult<SocketAddr> {
        let addr = self.addr.trim();
        let full = if addr.starts_with(':') {
            format!("0.0.0.0{addr}")
        } else {
            addr.to_string()
        };

        full.parse()
            .map_err(|e| CoreError::config(format!("invalid server.addr {:?}: {}", self.addr, e)))
    }

    /// 요청 타임아웃.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// graceful shutdown 유예 시간.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// 텔레그램 설정.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    #[serde(deserialize_with = "deserialize_secret")]
    pub bot_token: Option<SecretString>,
    /// 메시지를 보낼 채팅 ID
    pub chat_id: String,
    /// Bot API 기본 주소
    pub api_base_url: String,
    /// HTTP 호출당 타임아웃 (초)
    pub request_timeout_secs: u64,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: String::new(),
            api_base_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl TelegramConfig {
    /// 봇 토큰 원문. 설정되지 않았으면 빈 문자열.
    pub fn bot_token(&self) -> &str {
        self.bot_token
            .as_ref()
            .map(|token| token.expose_secret())
            .unwrap_or_default()
    }

    /// HTTP 호출 타임아웃.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 알림 전달 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// 웹훅 요청당 전달 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

impl DeliveryConfig {
    /// 전달 타임아웃.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드하고 검증합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        Self::load_with_env(path, None)
    }

    /// 환경 변수 소스를 직접 지정하여 설정을 로드합니다.
    ///
    /// `env`가 `None`이면 프로세스 환경 변수를 사용합니다.
    pub fn load_with_env<P: AsRef<Path>>(
        path: P,
        env: Option<config::Map<String, String>>,
    ) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .set_default("server.addr", ":8080")?
            .set_default("telegram.api_base_url", DEFAULT_TELEGRAM_API_URL)?
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 값을 검증합니다.
    ///
    /// 자격 증명이 비어 있으면 서버를 시작할 수 없습니다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.telegram.bot_token().trim().is_empty() {
            return Err(CoreError::config("telegram.bot_token is required"));
        }
        if self.telegram.chat_id.trim().is_empty() {
            return Err(CoreError::config("telegram.chat_id is required"));
        }
        if self.delivery.timeout_secs == 0 {
            return Err(CoreError::config("delivery.timeout_secs must be positive"));
        }
        if self.telegram.request_timeout_secs == 0 {
            return Err(CoreError::config(
                "telegram.request_timeout_secs must be positive",
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(CoreError::config(
                "server.request_timeout_secs must be positive",
            ));
        }
        // 전달 타임아웃(502)이 요청 타임아웃(408)보다 먼저 만료되어야 한다
        if self.server.request_timeout_secs <= self.delivery.timeout_secs {
            return Err(CoreError::config(format!(
                "server.request_timeout_secs ({}) must be greater than delivery.timeout_secs ({})",
                self.server.request_timeout_secs, self.delivery.timeout_secs
            )));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn empty_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
            [server]
            addr = "127.0.0.1:9000"
            shutdown_grace_secs = 3

            [telegram]
            bot_token = "123:abc"
            chat_id = "@alerts"
            api_base_url = "http://localhost:8081"

            [delivery]
            timeout_secs = 2

            [logging]
            level = "debug"
            format = "json"
            "#,
        );

        let config = AppConfig::load_with_env(file.path(), empty_env()).unwrap();

        assert_eq!(config.telegram.bot_token(), "123:abc");
        assert_eq!(config.telegram.chat_id, "@alerts");
        assert_eq!(config.telegram.api_base_url, "http://localhost:8081");
        assert_eq!(config.delivery.timeout(), Duration::from_secs(2));
        assert_eq!(config.server.shutdown_grace(), Duration::from_secs(3));
        assert_eq!(
            config.server.socket_addr().unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_defaults_applied() {
        let file = write_config(
            r#"
            [telegram]
            bot_token = "123:abc"
            chat_id = "@alerts"
            "#,
        );

        let config = AppConfig::load_with_env(file.path(), empty_env()).unwrap();

        assert_eq!(config.server.addr, ":8080");
        assert_eq!(
            config.server.socket_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.server.shutdown_grace(), Duration::from_secs(5));
        assert_eq!(config.delivery.timeout(), Duration::from_secs(5));
        assert_eq!(config.telegram.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.telegram.api_base_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config(
            r#"
            [telegram]
            bot_token = "from-file"
            chat_id = "@file_chat"
            "#,
        );

        let mut env = config::Map::new();
        env.insert(
            "ALERT__TELEGRAM__CHAT_ID".to_string(),
            "@env_chat".to_string(),
        );
        env.insert("ALERT__DELIVERY__TIMEOUT_SECS".to_string(), "9".to_string());

        let config = AppConfig::load_with_env(file.path(), Some(env)).unwrap();

        assert_eq!(config.telegram.bot_token(), "from-file");
        assert_eq!(config.telegram.chat_id, "@env_chat");
        assert_eq!(config.delivery.timeout(), Duration::from_secs(9));
    }

    #[test]
    fn test_missing_bot_token_rejected() {
        let file = write_config(
            r#"
            [telegram]
            chat_id = "@alerts"
            "#,
        );

        let err = AppConfig::load_with_env(file.path(), empty_env()).unwrap_err();
        assert!(matches!(err, CoreError::Config(ref m) if m.contains("bot_token")));
    }

    #[test]
    fn test_blank_chat_id_rejected() {
        let file = write_config(
            r#"
            [telegram]
            bot_token = "123:abc"
            chat_id = "   "
            "#,
        );

        let err = AppConfig::load_with_env(file.path(), empty_env()).unwrap_err();
        assert!(matches!(err, CoreError::Config(ref m) if m.contains("chat_id")));
    }

    #[test]
    fn test_request_timeout_must_exceed_delivery_timeout() {
        for (request, delivery) in [(2, 5), (5, 5)] {
            let file = write_config(&format!(
                r#"
                [server]
                request_timeout_secs = {request}

                [telegram]
                bot_token = "123:abc"
                chat_id = "@alerts"

                [delivery]
                timeout_secs = {delivery}
                "#
            ));

            let err = AppConfig::load_with_env(file.path(), empty_env()).unwrap_err();
            assert!(
                matches!(err, CoreError::Config(ref m) if m.contains("request_timeout_secs")),
                "request={request} delivery={delivery}: {err}"
            );
        }
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = AppConfig::load_with_env("/nonexistent/alert-relay.toml", empty_env());
        assert!(matches!(err, Err(CoreError::Load(_))));
    }

    #[test]
    fn test_invalid_addr_rejected() {
        let server = ServerConfig {
            addr: "not-an-addr".to_string(),
            ..Default::default()
        };
        assert!(server.socket_addr().is_err());
    }

    #[test]
    fn test_bot_token_redacted_in_debug() {
        let file = write_config(
            r#"
            [telegram]
            bot_token = "super-secret-token"
            chat_id = "@alerts"
            "#,
        );

        let config = AppConfig::load_with_env(file.path(), empty_env()).unwrap();
        let debug = format!("{:?}", config.telegram);
        assert!(!debug.contains("super-secret-token"));
    }
}
