pub mod chat;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod handlers;
pub mod listing;
pub mod query;
pub mod scheduler;

// region:    --- Imports
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use context::AppContext;
use scheduler::ReplyScheduler;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// endregion: --- Imports

// region:    --- Router
/// 라우터 구성
pub fn build_router(
    ctx: Arc<AppContext>,
    scheduler: Arc<ReplyScheduler>,
    body_limit_bytes: usize,
) -> Router {
    // 프론트엔드 개발 서버를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/session", get(handlers::handle_get_session))
        .route("/session/login", post(handlers::handle_login))
        .route("/session/logout", post(handlers::handle_logout))
        .route(
            "/listings",
            get(handlers::handle_get_listings).post(handlers::handle_create_listing),
        )
        .route("/listings/stats", get(handlers::handle_get_listing_stats))
        .route(
            "/listings/:id",
            get(handlers::handle_get_listing)
                .patch(handlers::handle_update_listing)
                .delete(handlers::handle_delete_listing),
        )
        .route("/listings/:id/sold", post(handlers::handle_mark_sold))
        .route(
            "/chat",
            get(handlers::handle_get_chat).delete(handlers::handle_leave_chat),
        )
        .route("/chat/start", post(handlers::handle_start_chat))
        .route("/chat/messages", post(handlers::handle_send_message))
        .route("/chat/quick-replies", get(handlers::handle_get_quick_replies))
        .route(
            "/draft",
            get(handlers::handle_get_draft)
                .put(handlers::handle_put_draft)
                .patch(handlers::handle_edit_draft)
                .delete(handlers::handle_discard_draft),
        )
        .route("/draft/approve", post(handlers::handle_approve_draft))
        .route("/draft/modify", post(handlers::handle_modify_draft))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit_bytes)) // 이미지 참조가 포함된 요청을 위한 여유
        .with_state((ctx, scheduler))
}
// endregion: --- Router
