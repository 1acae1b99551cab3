/// 세션 범위 애플리케이션 상태
/// 로그인 여부, 상품 목록, 대화 기록, 현재 초안을 한곳에서 관리한다.
/// 최상위 조립 단계에서 생성되어 `Arc` 로 공유되며, 모든 변경은 타입이 정해진 메서드로만 한다.
// region:    --- Imports
use crate::chat::draft::{compose_draft, revise_draft, DraftPhase};
use crate::chat::model::{ChatMessage, FlowType, Sender};
use crate::chat::stepper::{self, ScriptedReply};
use crate::error::MarketError;
use crate::events::{EventBroker, MarketEvent};
use crate::listing::model::{Listing, ListingStatus, ListingUpdate};
use chrono::{TimeZone, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- State
#[derive(Debug, Default)]
struct MarketState {
    logged_in: bool,
    listings: Vec<Listing>,
    transcript: Vec<ChatMessage>,
    current_draft: Option<Listing>,
    draft_phase: DraftPhase,
    /// 대화로 수정 중이면 다음 답장에서 초안 준비 신호를 다시 올린다
    revising: bool,
    flow: Option<FlowType>,
    typing: bool,
    /// 대화가 시작/종료될 때마다 증가. 예약된 답장은 자신의 세션이 아니면 버려진다.
    session: u64,
}

impl MarketState {
    fn reset_conversation(&mut self) {
        self.session += 1;
        self.transcript.clear();
        self.typing = false;
        self.revising = false;
    }
}

/// 사용자 메시지 기록 후 예약해야 할 답장 정보
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub session: u64,
    pub message: ChatMessage,
    pub reply: ScriptedReply,
    pub raises_draft_ready: bool,
}

/// 대화 화면 조회용 스냅샷
#[derive(Debug, Serialize, Clone)]
pub struct ConversationView {
    pub flow: Option<FlowType>,
    pub session: u64,
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
    pub draft_phase: DraftPhase,
    pub quick_replies: Vec<&'static str>,
}

// endregion: --- State

// region:    --- App Context
pub struct AppContext {
    state: RwLock<MarketState>,
    broker: EventBroker,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext {
    pub fn new() -> Self {
        Self::with_broker(EventBroker::new())
    }

    pub fn with_broker(broker: EventBroker) -> Self {
        Self {
            state: RwLock::new(MarketState::default()),
            broker,
        }
    }

    /// 데모용 상품 두 개가 들어있는 상태로 생성
    pub fn with_demo_listings(broker: EventBroker) -> Self {
        let mut iphone = Listing::new(
            "iPhone 13 Pro Max",
            850.0,
            "Excellent",
            "Barely used iPhone 13 Pro Max in excellent condition. Comes with original box and charger.",
            ListingStatus::Active,
        )
        .with_images(vec![
            "https://images.unsplash.com/photo-1592750475338-74b7b21085ab?w=400".to_string(),
        ]);
        iphone.id = "1".to_string();
        if let Some(created) = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).single() {
            iphone.created_at = created;
        }

        let mut macbook = Listing::new(
            "MacBook Air M2",
            1200.0,
            "Good",
            "MacBook Air M2 with 256GB storage. Perfect for students and professionals.",
            ListingStatus::Active,
        )
        .with_images(vec![
            "https://images.unsplash.com/photo-1541807084-5c52b6b3adef?w=400".to_string(),
        ]);
        macbook.id = "2".to_string();
        if let Some(created) = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).single() {
            macbook.created_at = created;
        }

        Self {
            state: RwLock::new(MarketState {
                listings: vec![iphone, macbook],
                ..MarketState::default()
            }),
            broker,
        }
    }

    pub fn broker(&self) -> &EventBroker {
        &self.broker
    }

    // region:    --- Session

    pub async fn is_logged_in(&self) -> bool {
        self.state.read().await.logged_in
    }

    /// 로그인 여부 설정. 값이 바뀔 때만 이벤트를 발행한다.
    pub async fn set_logged_in(&self, value: bool) {
        let mut state = self.state.write().await;
        if state.logged_in == value {
            return;
        }
        state.logged_in = value;
        info!("{:<12} --> 로그인 상태 변경: {}", "Context", value);
        self.broker.publish(MarketEvent::LoginChanged {
            logged_in: value,
            timestamp: Utc::now(),
        });
    }

    // endregion: --- Session

    // region:    --- Listings

    pub async fn listings(&self) -> Vec<Listing> {
        self.state.read().await.listings.clone()
    }

    pub async fn listing(&self, id: &str) -> Option<Listing> {
        self.state
            .read()
            .await
            .listings
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }

    /// 상품 추가. 이미 있는 id 는 거부한다.
    pub async fn add_listing(&self, listing: Listing) -> Result<(), MarketError> {
        let mut state = self.state.write().await;
        Self::push_listing(&mut state, listing, &self.broker)
    }

    fn push_listing(
        state: &mut MarketState,
        listing: Listing,
        broker: &EventBroker,
    ) -> Result<(), MarketError> {
        if state.listings.iter().any(|l| l.id == listing.id) {
            return Err(MarketError::DuplicateListing { id: listing.id });
        }
        info!("{:<12} --> 상품 추가 id: {}", "Context", listing.id);
        broker.publish(MarketEvent::ListingAdded {
            listing_id: listing.id.clone(),
            timestamp: Utc::now(),
        });
        state.listings.push(listing);
        Ok(())
    }

    /// 상품 부분 수정. id 가 없으면 아무것도 하지 않고 `None` 을 돌려준다.
    pub async fn update_listing(
        &self,
        id: &str,
        update: ListingUpdate,
    ) -> Result<Option<Listing>, MarketError> {
        let mut state = self.state.write().await;
        let Some(listing) = state.listings.iter_mut().find(|l| l.id == id) else {
            debug!("{:<12} --> 수정 대상 없음 id: {}", "Context", id);
            return Ok(None);
        };

        if let Some(next) = update.status {
            if !listing.status.can_transition_to(next) {
                return Err(MarketError::InvalidTransition {
                    from: listing.status,
                    to: next,
                });
            }
        }

        let was_sold = listing.status == ListingStatus::Sold;
        listing.apply(update);
        let updated = listing.clone();

        let now = Utc::now();
        if !was_sold && updated.status == ListingStatus::Sold {
            self.broker.publish(MarketEvent::ListingSold {
                listing_id: updated.id.clone(),
                price: updated.price,
                timestamp: now,
            });
        } else {
            self.broker.publish(MarketEvent::ListingUpdated {
                listing_id: updated.id.clone(),
                timestamp: now,
            });
        }
        Ok(Some(updated))
    }

    /// 상품 삭제. 삭제했으면 `true`.
    pub async fn delete_listing(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        let before = state.listings.len();
        state.listings.retain(|l| l.id != id);
        let removed = state.listings.len() != before;
        if removed {
            info!("{:<12} --> 상품 삭제 id: {}", "Context", id);
            self.broker.publish(MarketEvent::ListingDeleted {
                listing_id: id.to_string(),
                timestamp: Utc::now(),
            });
        }
        removed
    }

    // endregion: --- Listings

    // region:    --- Chat

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.state.read().await.transcript.clone()
    }

    pub async fn add_chat_message(&self, message: ChatMessage) {
        let mut state = self.state.write().await;
        Self::push_message(&mut state, message, &self.broker);
    }

    fn push_message(state: &mut MarketState, message: ChatMessage, broker: &EventBroker) {
        broker.publish(MarketEvent::ChatMessageAdded {
            message_id: message.id.clone(),
            sender: message.sender,
            timestamp: message.timestamp,
        });
        state.transcript.push(message);
    }

    /// 대화 기록 비우기. 진행 중인 세션도 무효화된다.
    /// 저장소 수준의 기본 연산으로, 대화 흐름과 초안 단계는 건드리지 않는다.
    /// 라우트에서는 예약 취소까지 포함한 `end_conversation` 을 쓴다.
    pub async fn clear_chat(&self) {
        let mut state = self.state.write().await;
        state.reset_conversation();
        self.broker.publish(MarketEvent::ChatCleared {
            timestamp: Utc::now(),
        });
    }

    /// 새 대화 시작. 기록을 비우고 새 세션 번호를 돌려준다.
    pub async fn begin_conversation(&self, flow: FlowType) -> u64 {
        let mut state = self.state.write().await;
        state.reset_conversation();
        state.flow = Some(flow);
        if flow == FlowType::Sell {
            state.draft_phase = DraftPhase::Drafting;
        }
        info!(
            "{:<12} --> 대화 시작 flow: {:?}, session: {}",
            "Context", flow, state.session
        );
        self.broker.publish(MarketEvent::ChatCleared {
            timestamp: Utc::now(),
        });
        state.session
    }

    /// 대화 종료. 초안 슬롯은 유지된다.
    pub async fn end_conversation(&self) {
        let mut state = self.state.write().await;
        state.reset_conversation();
        state.flow = None;
        if state.draft_phase == DraftPhase::Drafting {
            state.draft_phase = if state.current_draft.is_some() {
                DraftPhase::Ready
            } else {
                DraftPhase::None
            };
        }
        info!("{:<12} --> 대화 종료", "Context");
        self.broker.publish(MarketEvent::ChatCleared {
            timestamp: Utc::now(),
        });
    }

    /// 사용자 메시지 기록 후 예약할 답장을 결정
    /// 대화 길이는 사용자 메시지를 추가하기 전 값으로 센다.
    pub async fn record_user_message(
        &self,
        message: ChatMessage,
    ) -> Result<PendingReply, MarketError> {
        let mut state = self.state.write().await;
        let flow = state.flow.ok_or(MarketError::NoConversation)?;

        let turn_count = state.transcript.len();
        let reply = stepper::next_reply(flow, turn_count);
        let raises_draft_ready = flow == FlowType::Sell
            && (reply.raises_draft_ready || state.revising)
            && state.draft_phase == DraftPhase::Drafting;

        debug!(
            "{:<12} --> 사용자 메시지 기록 turn: {}, draft_ready: {}",
            "Context", turn_count, raises_draft_ready
        );
        Self::push_message(&mut state, message.clone(), &self.broker);

        Ok(PendingReply {
            session: state.session,
            message,
            reply,
            raises_draft_ready,
        })
    }

    /// 해당 세션이 아직 유효할 때만 입력 중 표시 변경
    pub async fn set_typing(&self, session: u64, typing: bool) -> bool {
        let mut state = self.state.write().await;
        if state.session != session {
            return false;
        }
        if state.typing != typing {
            state.typing = typing;
            self.broker.publish(MarketEvent::TypingChanged {
                typing,
                timestamp: Utc::now(),
            });
        }
        true
    }

    /// 해당 세션이 아직 유효할 때만 안내 메시지 추가
    pub async fn deliver_reply(&self, session: u64, message: ChatMessage) -> bool {
        let mut state = self.state.write().await;
        if state.session != session {
            debug!(
                "{:<12} --> 만료된 세션의 답장 폐기 session: {}",
                "Context", session
            );
            return false;
        }
        if state.typing {
            state.typing = false;
            self.broker.publish(MarketEvent::TypingChanged {
                typing: false,
                timestamp: Utc::now(),
            });
        }
        Self::push_message(&mut state, message, &self.broker);
        true
    }

    pub async fn is_typing(&self) -> bool {
        self.state.read().await.typing
    }

    pub async fn conversation_view(&self) -> ConversationView {
        let state = self.state.read().await;
        let quick_replies = state
            .flow
            .map(|flow| {
                stepper::quick_replies(
                    flow,
                    state.transcript.len(),
                    state.draft_phase == DraftPhase::Ready,
                )
            })
            .unwrap_or_default();
        ConversationView {
            flow: state.flow,
            session: state.session,
            messages: state.transcript.clone(),
            typing: state.typing,
            draft_phase: state.draft_phase,
            quick_replies,
        }
    }

    // endregion: --- Chat

    // region:    --- Draft

    pub async fn current_draft(&self) -> Option<Listing> {
        self.state.read().await.current_draft.clone()
    }

    pub async fn draft_phase(&self) -> DraftPhase {
        self.state.read().await.draft_phase
    }

    /// 초안 슬롯 교체. 들어온 초안은 항상 draft 상태로 저장된다.
    pub async fn set_current_draft(&self, draft: Option<Listing>) {
        let mut state = self.state.write().await;
        match draft {
            Some(mut draft) => {
                draft.status = ListingStatus::Draft;
                state.draft_phase = DraftPhase::Ready;
                state.revising = false;
                self.broker.publish(MarketEvent::DraftReady {
                    draft_id: draft.id.clone(),
                    timestamp: Utc::now(),
                });
                state.current_draft = Some(draft);
            }
            None => {
                state.current_draft = None;
                state.draft_phase = DraftPhase::None;
                state.revising = false;
            }
        }
    }

    /// 초안 필드 수정
    pub async fn edit_current_draft(
        &self,
        mut update: ListingUpdate,
    ) -> Result<Listing, MarketError> {
        let mut state = self.state.write().await;
        let draft = state.current_draft.as_mut().ok_or(MarketError::NoDraft)?;
        update.status = None;
        draft.apply(update);
        Ok(draft.clone())
    }

    /// drafting -> ready. 대화 내용으로 초안을 만들거나(수정 중이면) 기존 초안에 덧붙인다.
    /// 이미 ready 이거나 세션이 바뀌었으면 아무것도 하지 않는다.
    pub async fn raise_draft_ready(&self, session: u64) -> Option<Listing> {
        let mut state = self.state.write().await;
        if state.session != session || state.draft_phase != DraftPhase::Drafting {
            return None;
        }

        let revision = state
            .transcript
            .iter()
            .rev()
            .find(|m| m.sender == Sender::User)
            .cloned();
        let draft = match (state.revising, state.current_draft.take(), revision) {
            (true, Some(mut draft), Some(revision)) => {
                revise_draft(&mut draft, &revision);
                draft
            }
            _ => compose_draft(&state.transcript),
        };

        state.revising = false;
        state.draft_phase = DraftPhase::Ready;
        state.current_draft = Some(draft.clone());
        info!("{:<12} --> 초안 준비 완료 id: {}", "Context", draft.id);
        self.broker.publish(MarketEvent::DraftReady {
            draft_id: draft.id.clone(),
            timestamp: Utc::now(),
        });
        Some(draft)
    }

    /// ready 단계의 초안
    fn ready_draft(state: &MarketState) -> Result<&Listing, MarketError> {
        match (&state.current_draft, state.draft_phase) {
            (Some(draft), DraftPhase::Ready) => Ok(draft),
            (None, _) => Err(MarketError::NoDraft),
            (Some(_), phase) => Err(MarketError::InvalidDraftTransition {
                expected: DraftPhase::Ready.as_str(),
                actual: phase.as_str(),
            }),
        }
    }

    /// ready -> active. 초안을 active 상품으로 등록하고 대화 기록을 비운다.
    pub async fn approve_draft(&self) -> Result<Listing, MarketError> {
        let mut state = self.state.write().await;
        let draft = Self::ready_draft(&state)?.clone();

        let listing = Listing {
            status: ListingStatus::Active,
            created_at: Utc::now(),
            ..draft
        };
        Self::push_listing(&mut state, listing.clone(), &self.broker)?;

        state.current_draft = None;
        state.draft_phase = DraftPhase::Active;
        state.flow = None;
        state.reset_conversation();
        info!("{:<12} --> 초안 승인 id: {}", "Context", listing.id);
        self.broker.publish(MarketEvent::ChatCleared {
            timestamp: Utc::now(),
        });
        self.broker.publish(MarketEvent::DraftApproved {
            listing_id: listing.id.clone(),
            timestamp: Utc::now(),
        });
        Ok(listing)
    }

    /// ready -> drafting. 초안 내용은 그대로 두고 준비 신호만 내린다.
    pub async fn modify_draft(&self) -> Result<Listing, MarketError> {
        let mut state = self.state.write().await;
        let draft = Self::ready_draft(&state)?.clone();
        state.draft_phase = DraftPhase::Drafting;
        state.revising = true;
        // 구매 대화 중이어도 수정은 판매 흐름으로 이어진다
        state.flow = Some(FlowType::Sell);
        info!("{:<12} --> 대화로 초안 수정", "Context");
        Ok(draft)
    }

    /// ready -> none. 초안 폐기.
    pub async fn discard_draft(&self) -> Result<(), MarketError> {
        let mut state = self.state.write().await;
        Self::ready_draft(&state)?;
        let draft = state.current_draft.take();
        state.draft_phase = DraftPhase::None;
        state.revising = false;
        if let Some(draft) = draft {
            info!("{:<12} --> 초안 폐기 id: {}", "Context", draft.id);
            self.broker.publish(MarketEvent::DraftDiscarded {
                draft_id: draft.id,
                timestamp: Utc::now(),
            });
        }
        Ok(())
    }

    // endregion: --- Draft
}
// endregion: --- App Context
