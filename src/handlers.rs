// region:    --- Imports
use crate::chat::commands::{approve_draft, leave_conversation, send_message, start_conversation};
use crate::chat::model::{SendMessageCommand, StartConversationCommand};
use crate::context::AppContext;
use crate::error::MarketError;
use crate::listing::commands::{create_listing, mark_sold};
use crate::listing::model::{ListingStatus, ListingUpdate, NewListing};
use crate::query;
use crate::query::queries::ListingQuery;
use crate::scheduler::ReplyScheduler;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

pub type AppState = (Arc<AppContext>, Arc<ReplyScheduler>);

// region:    --- Session Handlers

/// 로그인 상태 조회
pub async fn handle_get_session(State((ctx, _)): State<AppState>) -> impl IntoResponse {
    let logged_in = ctx.is_logged_in().await;
    Json(serde_json::json!({ "logged_in": logged_in }))
}

/// 로그인 (인증 없이 바로 로그인 처리)
pub async fn handle_login(State((ctx, _)): State<AppState>) -> impl IntoResponse {
    info!("{:<12} --> 로그인", "Handler");
    ctx.set_logged_in(true).await;
    Json(serde_json::json!({ "logged_in": true }))
}

/// 로그아웃
pub async fn handle_logout(State((ctx, _)): State<AppState>) -> impl IntoResponse {
    info!("{:<12} --> 로그아웃", "Handler");
    ctx.set_logged_in(false).await;
    Json(serde_json::json!({ "logged_in": false }))
}

// endregion: --- Session Handlers

// region:    --- Listing Handlers

/// 상품 등록
pub async fn handle_create_listing(
    State((ctx, _)): State<AppState>,
    Json(cmd): Json<NewListing>,
) -> Result<impl IntoResponse, MarketError> {
    info!("{:<12} --> 상품 등록 요청 처리 시작: {:?}", "Command", cmd);
    let listing = create_listing(&ctx, cmd).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// 상품 수정
pub async fn handle_update_listing(
    State((ctx, _)): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ListingUpdate>,
) -> Result<impl IntoResponse, MarketError> {
    info!("{:<12} --> 상품 수정 요청 id: {}", "Command", id);
    match ctx.update_listing(&id, update).await? {
        Some(listing) => Ok(Json(listing)),
        None => Err(MarketError::NotFound { id }),
    }
}

/// 상품 삭제
pub async fn handle_delete_listing(
    State((ctx, _)): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    info!("{:<12} --> 상품 삭제 요청 id: {}", "Command", id);
    if ctx.delete_listing(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MarketError::NotFound { id })
    }
}

/// 판매 완료 처리
pub async fn handle_mark_sold(
    State((ctx, _)): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    info!("{:<12} --> 판매 완료 요청 id: {}", "Command", id);
    Ok(Json(mark_sold(&ctx, &id).await?))
}

/// 상품 목록 조회
pub async fn handle_get_listings(
    State((ctx, _)): State<AppState>,
    Query(params): Query<ListingQuery>,
) -> impl IntoResponse {
    Json(query::handlers::get_listings(&ctx, &params).await)
}

/// 상품 조회
pub async fn handle_get_listing(
    State((ctx, _)): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    Ok(Json(query::handlers::get_listing(&ctx, &id).await?))
}

/// 상품 통계 조회
pub async fn handle_get_listing_stats(State((ctx, _)): State<AppState>) -> impl IntoResponse {
    Json(query::handlers::get_listing_stats(&ctx).await)
}

// endregion: --- Listing Handlers

// region:    --- Chat Handlers

/// 대화 시작
pub async fn handle_start_chat(
    State((ctx, scheduler)): State<AppState>,
    Json(cmd): Json<StartConversationCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 대화 시작 요청: {:?}", "Command", cmd);
    let session = start_conversation(&ctx, &scheduler, cmd.flow).await;
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "flow": cmd.flow, "session": session })),
    )
}

/// 대화 조회
pub async fn handle_get_chat(State((ctx, _)): State<AppState>) -> impl IntoResponse {
    Json(ctx.conversation_view().await)
}

/// 메시지 전송. 빈 메시지는 저장하지 않고 204 를 돌려준다.
pub async fn handle_send_message(
    State((ctx, scheduler)): State<AppState>,
    Json(cmd): Json<SendMessageCommand>,
) -> Result<axum::response::Response, MarketError> {
    match send_message(&ctx, &scheduler, cmd).await? {
        Some(message) => Ok((StatusCode::CREATED, Json(message)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// 대화 종료
pub async fn handle_leave_chat(State((ctx, scheduler)): State<AppState>) -> impl IntoResponse {
    info!("{:<12} --> 대화 종료 요청", "Command");
    leave_conversation(&ctx, &scheduler).await;
    StatusCode::NO_CONTENT
}

/// 빠른 답장 조회
pub async fn handle_get_quick_replies(State((ctx, _)): State<AppState>) -> impl IntoResponse {
    Json(ctx.conversation_view().await.quick_replies)
}

// endregion: --- Chat Handlers

// region:    --- Draft Handlers

/// 현재 초안 조회
pub async fn handle_get_draft(State((ctx, _)): State<AppState>) -> impl IntoResponse {
    let phase = ctx.draft_phase().await;
    let draft = ctx.current_draft().await;
    Json(serde_json::json!({ "phase": phase, "draft": draft }))
}

/// 초안 지정
pub async fn handle_put_draft(
    State((ctx, _)): State<AppState>,
    Json(cmd): Json<NewListing>,
) -> impl IntoResponse {
    let draft = cmd.into_listing(ListingStatus::Draft);
    info!("{:<12} --> 초안 지정 id: {}", "Command", draft.id);
    ctx.set_current_draft(Some(draft)).await;
    Json(ctx.current_draft().await)
}

/// 초안 수정
pub async fn handle_edit_draft(
    State((ctx, _)): State<AppState>,
    Json(update): Json<ListingUpdate>,
) -> Result<impl IntoResponse, MarketError> {
    Ok(Json(ctx.edit_current_draft(update).await?))
}

/// 초안 폐기
pub async fn handle_discard_draft(
    State((ctx, _)): State<AppState>,
) -> Result<impl IntoResponse, MarketError> {
    info!("{:<12} --> 초안 폐기 요청", "Command");
    ctx.discard_draft().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 초안 승인
pub async fn handle_approve_draft(
    State((ctx, scheduler)): State<AppState>,
) -> Result<impl IntoResponse, MarketError> {
    info!("{:<12} --> 초안 승인 요청", "Command");
    let listing = approve_draft(&ctx, &scheduler).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// 대화로 초안 수정
pub async fn handle_modify_draft(
    State((ctx, _)): State<AppState>,
) -> Result<impl IntoResponse, MarketError> {
    info!("{:<12} --> 대화로 초안 수정 요청", "Command");
    Ok(Json(ctx.modify_draft().await?))
}

// endregion: --- Draft Handlers
