use chat_market::chat::commands::{approve_draft, leave_conversation, send_message, start_conversation};
use chat_market::chat::draft::DraftPhase;
use chat_market::chat::model::{ChatMessage, FlowType, SendMessageCommand, Sender};
use chat_market::chat::stepper::{
    BUY_GREETING, BUY_SEARCH_RESULTS, SELL_COMPLETE, SELL_CONDITION_QUESTION, SELL_FOLLOW_UP,
    SELL_GREETING, SELL_PRICE_QUESTION,
};
use chat_market::context::AppContext;
use chat_market::error::MarketError;
use chat_market::events::MarketEvent;
use chat_market::listing::model::{Listing, ListingStatus};
use chat_market::scheduler::ReplyScheduler;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{sleep, Duration};

/// 컨텍스트와 스케줄러 생성
fn setup() -> (Arc<AppContext>, Arc<ReplyScheduler>) {
    let ctx = Arc::new(AppContext::new());
    let scheduler = Arc::new(ReplyScheduler::new(Arc::clone(&ctx)));
    (ctx, scheduler)
}

fn text(content: &str) -> SendMessageCommand {
    SendMessageCommand {
        content: content.to_string(),
        images: Vec::new(),
    }
}

/// 수신된 초안 준비 이벤트 개수
fn count_draft_ready(rx: &mut broadcast::Receiver<MarketEvent>) -> usize {
    let mut count = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, MarketEvent::DraftReady { .. }) {
            count += 1;
        }
    }
    count
}

fn assistant_texts(transcript: &[ChatMessage]) -> Vec<String> {
    transcript
        .iter()
        .filter(|m| m.sender == Sender::Assistant)
        .map(|m| m.content.clone())
        .collect()
}

/// 판매 대화를 초안 준비 단계까지 진행
async fn run_sell_flow(ctx: &AppContext, scheduler: &ReplyScheduler) {
    start_conversation(ctx, scheduler, FlowType::Sell).await;
    sleep(Duration::from_millis(600)).await;
    for answer in ["Vintage Americana Sneakers", "Used - Good", "About 25 pounds"] {
        send_message(ctx, scheduler, text(answer)).await.unwrap();
        sleep(Duration::from_millis(2000)).await;
    }
    sleep(Duration::from_millis(1000)).await;
}

/// 판매 대화: 세 번째 답변 이후에만 초안 준비 신호가 정확히 한 번 올라간다
#[tokio::test(start_paused = true)]
async fn test_sell_flow_raises_draft_ready_once() {
    let (ctx, scheduler) = setup();
    let mut rx = ctx.broker().subscribe();

    start_conversation(&ctx, &scheduler, FlowType::Sell).await;
    sleep(Duration::from_millis(600)).await;
    assert_eq!(assistant_texts(&ctx.transcript().await), vec![SELL_GREETING]);

    send_message(&ctx, &scheduler, text("Vintage Americana Sneakers")).await.unwrap();
    sleep(Duration::from_millis(2000)).await;
    send_message(&ctx, &scheduler, text("Used - Good")).await.unwrap();
    sleep(Duration::from_millis(2000)).await;
    assert_eq!(count_draft_ready(&mut rx), 0);

    send_message(&ctx, &scheduler, text("I'd take 25 for them")).await.unwrap();
    sleep(Duration::from_millis(1600)).await;

    // 완료 답장은 도착했지만 초안 준비 신호는 아직
    let transcript = ctx.transcript().await;
    assert_eq!(transcript.len(), 7);
    assert_eq!(
        assistant_texts(&transcript),
        vec![
            SELL_GREETING,
            SELL_CONDITION_QUESTION,
            SELL_PRICE_QUESTION,
            SELL_COMPLETE
        ]
    );
    assert_eq!(ctx.draft_phase().await, DraftPhase::Drafting);
    assert!(ctx.current_draft().await.is_none());
    assert_eq!(count_draft_ready(&mut rx), 0);

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(ctx.draft_phase().await, DraftPhase::Ready);
    assert_eq!(count_draft_ready(&mut rx), 1);

    let draft = ctx.current_draft().await.unwrap();
    assert_eq!(draft.title, "Vintage Americana Sneakers");
    assert_eq!(draft.condition, "Used - Good");
    assert_eq!(draft.price, 25.0);
    assert_eq!(draft.status, ListingStatus::Draft);

    // 이후 메시지는 일반 후속 질문만 받고 신호는 다시 오르지 않는다
    send_message(&ctx, &scheduler, text("Anything else?")).await.unwrap();
    sleep(Duration::from_millis(3000)).await;
    let last = ctx.transcript().await.last().cloned().unwrap();
    assert_eq!(last.content, SELL_FOLLOW_UP);
    assert_eq!(count_draft_ready(&mut rx), 0);
}

/// 구매 대화: 대화 길이와 무관하게 같은 답장
#[tokio::test(start_paused = true)]
async fn test_buy_flow_always_replies_with_search_results() {
    let (ctx, scheduler) = setup();

    start_conversation(&ctx, &scheduler, FlowType::Buy).await;
    sleep(Duration::from_millis(600)).await;
    for query in ["Show me electronics", "Something cheaper", "Anything in London?"] {
        send_message(&ctx, &scheduler, text(query)).await.unwrap();
        sleep(Duration::from_millis(2000)).await;
    }

    let replies = assistant_texts(&ctx.transcript().await);
    assert_eq!(replies[0], BUY_GREETING);
    assert_eq!(replies.len(), 4);
    assert!(replies[1..].iter().all(|r| r == BUY_SEARCH_RESULTS));
    assert_eq!(ctx.draft_phase().await, DraftPhase::None);
    assert!(ctx.current_draft().await.is_none());
}

/// 빈 메시지는 기록되지 않고 답장도 예약되지 않는다
#[tokio::test(start_paused = true)]
async fn test_empty_message_is_ignored() {
    let (ctx, scheduler) = setup();
    start_conversation(&ctx, &scheduler, FlowType::Sell).await;
    sleep(Duration::from_millis(600)).await;

    let sent = send_message(&ctx, &scheduler, text("   ")).await.unwrap();
    assert!(sent.is_none());
    assert_eq!(scheduler.pending_count(), 0);

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(ctx.transcript().await.len(), 1);
}

/// 이미지만 있는 메시지는 대체 문구로 기록된다
#[tokio::test(start_paused = true)]
async fn test_image_only_message_uses_placeholder() {
    let (ctx, scheduler) = setup();
    start_conversation(&ctx, &scheduler, FlowType::Sell).await;
    sleep(Duration::from_millis(600)).await;

    let cmd = SendMessageCommand {
        content: String::new(),
        images: vec!["blob:photo-1".to_string()],
    };
    let sent = send_message(&ctx, &scheduler, cmd).await.unwrap().unwrap();
    assert_eq!(sent.content, "Image uploaded");
    assert_eq!(sent.image_refs(), ["blob:photo-1".to_string()]);
}

/// 대화를 떠나면 예약된 답장이 취소된다
#[tokio::test(start_paused = true)]
async fn test_leaving_cancels_pending_reply() {
    let (ctx, scheduler) = setup();
    start_conversation(&ctx, &scheduler, FlowType::Sell).await;
    sleep(Duration::from_millis(600)).await;

    send_message(&ctx, &scheduler, text("A lamp")).await.unwrap();
    sleep(Duration::from_millis(400)).await;
    assert!(ctx.is_typing().await);

    leave_conversation(&ctx, &scheduler).await;
    assert_eq!(scheduler.pending_count(), 0);

    sleep(Duration::from_millis(5000)).await;
    assert!(ctx.transcript().await.is_empty());
    assert!(!ctx.is_typing().await);
    assert_eq!(ctx.conversation_view().await.flow, None);
}

/// 종료된 세션으로는 답장을 전달할 수 없다
#[tokio::test]
async fn test_stale_session_delivery_is_dropped() {
    let ctx = AppContext::new();
    let old_session = ctx.begin_conversation(FlowType::Buy).await;
    ctx.clear_chat().await;

    assert!(!ctx.deliver_reply(old_session, ChatMessage::assistant("late")).await);
    assert!(!ctx.set_typing(old_session, true).await);
    assert!(ctx.raise_draft_ready(old_session).await.is_none());
    assert!(ctx.transcript().await.is_empty());
}

/// 대화 기록을 비우면 대화 길이도 처음부터 다시 센다
#[tokio::test(start_paused = true)]
async fn test_clear_chat_restarts_turn_counting() {
    let (ctx, scheduler) = setup();
    start_conversation(&ctx, &scheduler, FlowType::Sell).await;
    sleep(Duration::from_millis(600)).await;
    send_message(&ctx, &scheduler, text("A desk")).await.unwrap();
    sleep(Duration::from_millis(2000)).await;
    assert_eq!(ctx.transcript().await.len(), 3);

    ctx.clear_chat().await;
    assert!(ctx.transcript().await.is_empty());

    send_message(&ctx, &scheduler, text("Hello again")).await.unwrap();
    sleep(Duration::from_millis(2000)).await;
    let transcript = ctx.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].content, SELL_FOLLOW_UP);
}

/// 승인: 초안이 같은 내용의 active 상품이 되고 대화 기록이 비워진다
#[tokio::test]
async fn test_approve_promotes_draft_and_clears_chat() {
    let (ctx, scheduler) = setup();
    ctx.begin_conversation(FlowType::Sell).await;
    ctx.add_chat_message(ChatMessage::user("Road bike", Vec::new()))
        .await;

    let draft = Listing::new(
        "Road bike",
        320.0,
        "Good",
        "Aluminium frame, recently serviced.",
        ListingStatus::Draft,
    );
    ctx.set_current_draft(Some(draft.clone())).await;
    assert_eq!(ctx.draft_phase().await, DraftPhase::Ready);

    let listing = approve_draft(&ctx, &scheduler).await.unwrap();
    assert_eq!(listing.status, ListingStatus::Active);

    let stored = ctx.listing(&draft.id).await.unwrap();
    assert_eq!(stored.title, draft.title);
    assert_eq!(stored.price, draft.price);
    assert_eq!(stored.condition, draft.condition);
    assert_eq!(stored.description, draft.description);
    assert_eq!(stored.status, ListingStatus::Active);

    assert!(ctx.transcript().await.is_empty());
    assert!(ctx.current_draft().await.is_none());
    assert_eq!(ctx.draft_phase().await, DraftPhase::Active);

    // 초안이 없으면 다시 승인할 수 없다
    assert!(approve_draft(&ctx, &scheduler).await.is_err());
}

/// 대화로 수정: 초안 내용은 유지되고 다음 답장에서 다시 준비된다
#[tokio::test(start_paused = true)]
async fn test_modify_via_chat_loops_back_to_ready() {
    let (ctx, scheduler) = setup();
    let mut rx = ctx.broker().subscribe();
    run_sell_flow(&ctx, &scheduler).await;
    assert_eq!(ctx.draft_phase().await, DraftPhase::Ready);
    let original = ctx.current_draft().await.unwrap();

    let kept = ctx.modify_draft().await.unwrap();
    assert_eq!(kept, original);
    assert_eq!(ctx.draft_phase().await, DraftPhase::Drafting);
    assert_eq!(ctx.current_draft().await, Some(original.clone()));

    send_message(&ctx, &scheduler, text("It also comes with the original box"))
        .await
        .unwrap();
    sleep(Duration::from_millis(2600)).await;

    assert_eq!(ctx.draft_phase().await, DraftPhase::Ready);
    let revised = ctx.current_draft().await.unwrap();
    assert_eq!(revised.id, original.id);
    assert_eq!(revised.price, original.price);
    assert!(revised.description.ends_with("It also comes with the original box"));
    assert_eq!(count_draft_ready(&mut rx), 2);
}

/// 구매 대화 중 수정 요청도 판매 흐름으로 이어져 다시 준비된다
#[tokio::test(start_paused = true)]
async fn test_modify_during_buy_conversation_switches_to_sell() {
    let (ctx, scheduler) = setup();
    let draft = Listing::new("Desk lamp", 15.0, "Used", "Brass lamp", ListingStatus::Draft);
    ctx.set_current_draft(Some(draft.clone())).await;

    start_conversation(&ctx, &scheduler, FlowType::Buy).await;
    sleep(Duration::from_millis(600)).await;
    assert_eq!(ctx.draft_phase().await, DraftPhase::Ready);

    ctx.modify_draft().await.unwrap();
    assert_eq!(ctx.conversation_view().await.flow, Some(FlowType::Sell));

    send_message(&ctx, &scheduler, text("Lower the price please"))
        .await
        .unwrap();
    sleep(Duration::from_millis(2600)).await;

    assert_eq!(ctx.draft_phase().await, DraftPhase::Ready);
    let revised = ctx.current_draft().await.unwrap();
    assert_eq!(revised.id, draft.id);
    assert!(revised.description.ends_with("Lower the price please"));
}

/// drafting 단계에서는 승인할 수 없고 초안 슬롯은 그대로다
#[tokio::test(start_paused = true)]
async fn test_approve_while_drafting_is_rejected() {
    let (ctx, _scheduler) = setup();
    let draft = Listing::new("Road bike", 320.0, "Good", "Serviced", ListingStatus::Draft);
    ctx.set_current_draft(Some(draft.clone())).await;
    ctx.modify_draft().await.unwrap();

    let err = ctx.approve_draft().await.unwrap_err();
    assert_eq!(
        err,
        MarketError::InvalidDraftTransition {
            expected: "ready",
            actual: "drafting",
        }
    );
    assert!(ctx.listing(&draft.id).await.is_none());
    assert_eq!(ctx.current_draft().await.map(|d| d.id), Some(draft.id));
    assert_eq!(ctx.draft_phase().await, DraftPhase::Drafting);
}

/// 폐기: ready -> none
#[tokio::test(start_paused = true)]
async fn test_discard_clears_draft_slot() {
    let (ctx, scheduler) = setup();
    run_sell_flow(&ctx, &scheduler).await;

    ctx.discard_draft().await.unwrap();
    assert!(ctx.current_draft().await.is_none());
    assert_eq!(ctx.draft_phase().await, DraftPhase::None);
    assert!(ctx.discard_draft().await.is_err());
}
