// region:    --- Imports
use crate::chat::model::Sender;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- Market Event
/// 상태 변경 이벤트
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum MarketEvent {
    ListingAdded {
        listing_id: String,
        timestamp: DateTime<Utc>,
    },
    ListingUpdated {
        listing_id: String,
        timestamp: DateTime<Utc>,
    },
    ListingDeleted {
        listing_id: String,
        timestamp: DateTime<Utc>,
    },
    ListingSold {
        listing_id: String,
        price: f64,
        timestamp: DateTime<Utc>,
    },
    ChatMessageAdded {
        message_id: String,
        sender: Sender,
        timestamp: DateTime<Utc>,
    },
    ChatCleared {
        timestamp: DateTime<Utc>,
    },
    TypingChanged {
        typing: bool,
        timestamp: DateTime<Utc>,
    },
    DraftReady {
        draft_id: String,
        timestamp: DateTime<Utc>,
    },
    DraftDiscarded {
        draft_id: String,
        timestamp: DateTime<Utc>,
    },
    DraftApproved {
        listing_id: String,
        timestamp: DateTime<Utc>,
    },
    LoginChanged {
        logged_in: bool,
        timestamp: DateTime<Utc>,
    },
}

impl MarketEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            MarketEvent::ListingAdded { .. } => "ListingAdded",
            MarketEvent::ListingUpdated { .. } => "ListingUpdated",
            MarketEvent::ListingDeleted { .. } => "ListingDeleted",
            MarketEvent::ListingSold { .. } => "ListingSold",
            MarketEvent::ChatMessageAdded { .. } => "ChatMessageAdded",
            MarketEvent::ChatCleared { .. } => "ChatCleared",
            MarketEvent::TypingChanged { .. } => "TypingChanged",
            MarketEvent::DraftReady { .. } => "DraftReady",
            MarketEvent::DraftDiscarded { .. } => "DraftDiscarded",
            MarketEvent::DraftApproved { .. } => "DraftApproved",
            MarketEvent::LoginChanged { .. } => "LoginChanged",
        }
    }
}
// endregion: --- Market Event

// region:    --- Event Broker
const CHANNEL_CAPACITY: usize = 256;

/// 프로세스 내부 이벤트 발행기
#[derive(Clone)]
pub struct EventBroker {
    sender: broadcast::Sender<MarketEvent>,
}

impl Default for EventBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBroker {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// 이벤트 발행. 구독자가 없어도 오류로 보지 않는다.
    pub fn publish(&self, event: MarketEvent) {
        let event_type = event.event_type();
        if self.sender.send(event).is_err() {
            debug!("{:<12} --> 구독자 없음: {}", "Broker", event_type);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.sender.subscribe()
    }
}
// endregion: --- Event Broker

// region:    --- Event Consumer
/// 이벤트 처리기 트레이트
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &MarketEvent);
}

/// 이벤트를 로그로 남기는 처리기
pub struct EventLogger;

#[async_trait]
impl EventHandler for EventLogger {
    async fn handle(&self, event: &MarketEvent) {
        info!("{:<12} --> {}: {:?}", "Event", event.event_type(), event);
    }
}

/// 이벤트 구독 후 처리기에 전달
pub struct EventConsumer {
    receiver: broadcast::Receiver<MarketEvent>,
    handler: Arc<dyn EventHandler>,
}

impl EventConsumer {
    pub fn new(broker: &EventBroker, handler: Arc<dyn EventHandler>) -> Self {
        Self {
            receiver: broker.subscribe(),
            handler,
        }
    }

    /// 채널이 닫힐 때까지 이벤트 소비
    pub async fn start(mut self) {
        loop {
            match self.receiver.recv().await {
                Ok(event) => self.handler.handle(&event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "{:<12} --> 처리 지연으로 이벤트 {}건 누락",
                        "Consumer", skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("{:<12} --> 이벤트 채널 종료", "Consumer");
                    break;
                }
            }
        }
    }
}
// endregion: --- Event Consumer
