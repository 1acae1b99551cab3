/// 안내 메시지 예약 스케줄러
/// 인사, 입력 중 표시, 답장, 초안 준비 신호를 정해진 지연 후에 전달한다.
/// 대화를 떠나거나 새로 시작하면 예약된 작업은 모두 취소된다.
// region:    --- Imports
use crate::chat::model::ChatMessage;
use crate::context::{AppContext, PendingReply};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Timing
/// 대화 시작 후 인사까지
pub const GREETING_DELAY: Duration = Duration::from_millis(500);
/// 전송 후 입력 중 표시까지
pub const TYPING_DELAY: Duration = Duration::from_millis(300);
/// 전송 후 답장까지
pub const REPLY_DELAY: Duration = Duration::from_millis(1500);
/// 완료 답장 후 초안 준비 신호까지
pub const DRAFT_READY_DELAY: Duration = Duration::from_millis(1000);

// endregion: --- Timing

// region:    --- Reply Scheduler
pub struct ReplyScheduler {
    ctx: Arc<AppContext>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl ReplyScheduler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// 예약된 작업 수(완료된 작업 제외)
    pub fn pending_count(&self) -> usize {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|h| !h.is_finished());
        pending.len()
    }

    /// 예약된 작업 모두 취소
    pub fn cancel_all(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        let count = pending.len();
        for handle in pending.drain(..) {
            handle.abort();
        }
        if count > 0 {
            info!("{:<12} --> 예약된 작업 {}건 취소", "Scheduler", count);
        }
    }

    /// 인사 메시지 예약
    pub fn schedule_greeting(&self, session: u64, text: &'static str) {
        let ctx = Arc::clone(&self.ctx);
        self.spawn(async move {
            sleep(GREETING_DELAY).await;
            ctx.deliver_reply(session, ChatMessage::assistant(text)).await;
        });
    }

    /// 답장 예약: 입력 중 표시 -> 답장 -> (필요하면) 초안 준비 신호
    pub fn schedule_reply(&self, pending: PendingReply) {
        let ctx = Arc::clone(&self.ctx);
        self.spawn(async move {
            let PendingReply {
                session,
                reply,
                raises_draft_ready,
                ..
            } = pending;

            sleep(TYPING_DELAY).await;
            if !ctx.set_typing(session, true).await {
                return;
            }

            sleep(REPLY_DELAY - TYPING_DELAY).await;
            if !ctx
                .deliver_reply(session, ChatMessage::assistant(reply.text))
                .await
            {
                return;
            }
            debug!("{:<12} --> 답장 전달 session: {}", "Scheduler", session);

            if raises_draft_ready {
                sleep(DRAFT_READY_DELAY).await;
                ctx.raise_draft_ready(session).await;
            }
        });
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
// endregion: --- Reply Scheduler
