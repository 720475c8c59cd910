//! # Alert Notification
//!
//! 차트 알림을 메신저로 전달하는 클라이언트.
//!
//! - [`MessageSender`]: 웹훅 핸들러가 의존하는 "텍스트 전송" trait
//! - [`TelegramClient`]: Telegram Bot API `sendMessage` 구현

pub mod telegram;
pub mod types;

pub use telegram::*;
pub use types::*;
