use crate::listing::model::{Listing, ListingStatus};
use serde::{Deserialize, Serialize};

/// 상품 목록 조회 조건
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ListingQuery {
    pub status: Option<ListingStatus>,
    /// 제목/설명 부분 일치 검색어(대소문자 무시)
    pub q: Option<String>,
}

impl ListingQuery {
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(status) = self.status {
            if listing.status != status {
                return false;
            }
        }
        match self.q.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                listing.title.to_lowercase().contains(&term)
                    || listing.description.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}
