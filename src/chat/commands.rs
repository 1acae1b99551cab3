/// 대화 관련 커맨드 처리
/// 1. 대화 시작
/// 2. 메시지 전송
/// 3. 대화 종료
/// 4. 초안 승인
// region:    --- Imports
use super::model::{ChatMessage, FlowType, SendMessageCommand};
use super::stepper;
use crate::context::AppContext;
use crate::error::MarketError;
use crate::listing::model::Listing;
use crate::scheduler::ReplyScheduler;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Commands
/// 이미지 없이 비어 있는 메시지를 대신하는 내용
pub const IMAGE_ONLY_CONTENT: &str = "Image uploaded";

/// 1. 대화 시작
/// 이전 대화에 예약된 작업은 취소되고, 잠시 후 인사 메시지가 도착한다.
pub async fn start_conversation(
    ctx: &AppContext,
    scheduler: &ReplyScheduler,
    flow: FlowType,
) -> u64 {
    scheduler.cancel_all();
    let session = ctx.begin_conversation(flow).await;
    scheduler.schedule_greeting(session, stepper::greeting(flow));
    session
}

/// 2. 메시지 전송
/// 내용과 이미지가 모두 비어 있으면 아무것도 하지 않고 `None` 을 돌려준다.
pub async fn send_message(
    ctx: &AppContext,
    scheduler: &ReplyScheduler,
    cmd: SendMessageCommand,
) -> Result<Option<ChatMessage>, MarketError> {
    let content = cmd.content.trim();
    if content.is_empty() && cmd.images.is_empty() {
        debug!("{:<12} --> 빈 메시지 무시", "Command");
        return Ok(None);
    }

    let content = if content.is_empty() {
        IMAGE_ONLY_CONTENT
    } else {
        content
    };
    let message = ChatMessage::user(content, cmd.images);

    let pending = ctx.record_user_message(message).await?;
    info!(
        "{:<12} --> 메시지 전송 session: {}, draft_ready: {}",
        "Command", pending.session, pending.raises_draft_ready
    );
    let message = pending.message.clone();
    scheduler.schedule_reply(pending);
    Ok(Some(message))
}

/// 3. 대화 종료
/// 예약된 답장은 모두 취소되고 대화 기록은 비워진다.
pub async fn leave_conversation(ctx: &AppContext, scheduler: &ReplyScheduler) {
    scheduler.cancel_all();
    ctx.end_conversation().await;
}

/// 4. 초안 승인
/// 승인과 함께 대화가 끝나므로 남은 예약 작업도 취소한다.
pub async fn approve_draft(
    ctx: &AppContext,
    scheduler: &ReplyScheduler,
) -> Result<Listing, MarketError> {
    let listing = ctx.approve_draft().await?;
    scheduler.cancel_all();
    Ok(listing)
}

// endregion: --- Commands
