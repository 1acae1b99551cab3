use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 대화 종류
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Buy,
    Sell,
}

// 메시지 발신자
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

// 채팅 메시지 모델
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::User,
            content: content.into(),
            images: if images.is_empty() { None } else { Some(images) },
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::Assistant,
            content: content.into(),
            images: None,
            timestamp: Utc::now(),
        }
    }

    pub fn image_refs(&self) -> &[String] {
        self.images.as_deref().unwrap_or(&[])
    }
}

// 메시지 전송 요청
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SendMessageCommand {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
}

// 대화 시작 요청
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StartConversationCommand {
    pub flow: FlowType,
}
