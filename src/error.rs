// region:    --- Imports
use crate::listing::model::ListingStatus;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Market Error
/// 서비스 전역 오류 타입
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MarketError {
    #[error("상품을 찾을 수 없습니다: {id}")]
    NotFound { id: String },

    #[error("이미 존재하는 상품 id 입니다: {id}")]
    DuplicateListing { id: String },

    #[error("허용되지 않는 상태 전이입니다: {from} -> {to}")]
    InvalidTransition { from: ListingStatus, to: ListingStatus },

    #[error("현재 초안이 없습니다.")]
    NoDraft,

    #[error("초안이 {expected} 단계가 아닙니다 (현재: {actual})")]
    InvalidDraftTransition {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("진행 중인 대화가 없습니다.")]
    NoConversation,

    #[error("설정 오류: {0}")]
    Config(String),
}

impl MarketError {
    /// 응답 본문에 실리는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            MarketError::NotFound { .. } => "NOT_FOUND",
            MarketError::DuplicateListing { .. } => "DUPLICATE_LISTING",
            MarketError::InvalidTransition { .. } => "INVALID_TRANSITION",
            MarketError::NoDraft => "NO_DRAFT",
            MarketError::InvalidDraftTransition { .. } => "INVALID_DRAFT_TRANSITION",
            MarketError::NoConversation => "NO_CONVERSATION",
            MarketError::Config(_) => "CONFIG",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            MarketError::NotFound { .. } => StatusCode::NOT_FOUND,
            MarketError::DuplicateListing { .. }
            | MarketError::NoDraft
            | MarketError::InvalidDraftTransition { .. } => StatusCode::CONFLICT,
            MarketError::InvalidTransition { .. } | MarketError::NoConversation => {
                StatusCode::BAD_REQUEST
            }
            MarketError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({
                "error": self.to_string(),
                "code": self.code()
            })),
        )
            .into_response()
    }
}
// endregion: --- Market Error
