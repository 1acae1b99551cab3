/// 상품 관련 커맨드 처리
/// 1. 상품 등록
/// 2. 판매 완료 처리
// region:    --- Imports
use super::model::{Listing, ListingStatus, ListingUpdate, NewListing};
use crate::context::AppContext;
use crate::error::MarketError;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 1. 상품 등록
/// id 가 없으면 새로 발급하고, 상태가 없으면 active 로 등록한다.
pub async fn create_listing(ctx: &AppContext, cmd: NewListing) -> Result<Listing, MarketError> {
    let listing = cmd.into_listing(ListingStatus::Active);
    info!("{:<12} --> 상품 등록 요청: {}", "Command", listing.title);
    ctx.add_listing(listing.clone()).await?;
    Ok(listing)
}

/// 2. 판매 완료 처리 (active -> sold)
pub async fn mark_sold(ctx: &AppContext, id: &str) -> Result<Listing, MarketError> {
    let listing = ctx.listing(id).await.ok_or_else(|| MarketError::NotFound {
        id: id.to_string(),
    })?;

    if listing.status != ListingStatus::Active {
        warn!(
            "{:<12} --> active 상태가 아닌 상품은 판매 처리할 수 없습니다 id: {}",
            "Command", id
        );
        return Err(MarketError::InvalidTransition {
            from: listing.status,
            to: ListingStatus::Sold,
        });
    }

    let update = ListingUpdate {
        status: Some(ListingStatus::Sold),
        ..ListingUpdate::default()
    };
    ctx.update_listing(id, update)
        .await?
        .ok_or_else(|| MarketError::NotFound { id: id.to_string() })
}

// endregion: --- Commands
