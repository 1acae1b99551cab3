// region:    --- Imports
use super::queries::ListingQuery;
use crate::context::AppContext;
use crate::error::MarketError;
use crate::listing::model::{Listing, ListingStats, ListingStatus};
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 조건에 맞는 상품 조회 (최근 등록순)
pub async fn get_listings(ctx: &AppContext, query: &ListingQuery) -> Vec<Listing> {
    info!("{:<12} --> 상품 목록 조회: {:?}", "Query", query);
    let mut listings: Vec<Listing> = ctx
        .listings()
        .await
        .into_iter()
        .filter(|l| query.matches(l))
        .collect();
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    listings
}

/// 상품 조회
pub async fn get_listing(ctx: &AppContext, id: &str) -> Result<Listing, MarketError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", id);
    ctx.listing(id)
        .await
        .ok_or_else(|| MarketError::NotFound { id: id.to_string() })
}

/// 판매 중/판매 완료 개수와 판매 금액 합계
pub async fn get_listing_stats(ctx: &AppContext) -> ListingStats {
    info!("{:<12} --> 상품 통계 조회", "Query");
    ctx.listings()
        .await
        .iter()
        .fold(ListingStats::default(), |mut stats, listing| {
            match listing.status {
                ListingStatus::Active => stats.active_count += 1,
                ListingStatus::Sold => {
                    stats.sold_count += 1;
                    stats.sold_revenue += listing.price;
                }
                ListingStatus::Draft => {}
            }
            stats
        })
}

// endregion: --- Query Handlers
