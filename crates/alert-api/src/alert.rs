//! 차트 서비스 웹훅 알림 페이로드.
//!
//! 요청마다 한 번 디코딩되고 응답 후 버려집니다.

use serde::{de, Deserialize, Deserializer};

/// 웹훅 알림 페이로드.
///
/// 누락된 필드와 JSON `null`은 빈 문자열로 디코딩되고, 알 수 없는 필드는 무시합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AlertPayload {
    /// 알림 본문 (필수)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    /// 종목 심볼 (와이어 이름 `tick`)
    #[serde(default, rename = "tick", deserialize_with = "null_as_empty")]
    pub ticker: String,
    /// 알림 시각 (형식 검증 없음)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub time: String,
    /// 알림 간격 (예: "1h")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interval: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 페이로드 검증 에러.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlertValidationError {
    #[error("message is required")]
    MissingMessage,
}

impl AlertPayload {
    /// JSON 본문을 디코딩합니다. `Content-Type`은 보지 않습니다.
    ///
    /// 첫 번째 JSON 값만 읽고 그 뒤에 오는 데이터는 무시합니다.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::Deserializer::from_slice(body)
            .into_iter::<Self>()
            .next()
            .unwrap_or_else(|| Err(de::Error::custom("empty body")))
    }

    /// 앞뒤 공백을 제거한 `message`가 비어 있으면 거부합니다.
    pub fn validate(&self) -> Result<(), AlertValidationError> {
        if self.message.trim().is_empty() {
            return Err(AlertValidationError::MissingMessage);
        }
        Ok(())
    }

    /// 메신저로 보낼 텍스트를 만듭니다.
    ///
    /// 원문 `message` 뒤에 값이 있는 필드만 `Symbol`, `Interval`, `Time` 순서로
    /// 한 줄씩 붙입니다. 마지막 줄바꿈은 없습니다.
    pub fn format_message(&self) -> String {
        let details: Vec<String> = [
            ("Symbol", &self.ticker),
            ("Interval", &self.interval),
            ("Time", &self.time),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect();

        if details.is_empty() {
            self.message.clone()
        } else {
            format!("{}\n{}", self.message, details.join("\n"))
        }
    }
}
