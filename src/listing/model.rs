use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// 상품 상태
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Draft,
    Active,
    Sold,
}

impl ListingStatus {
    /// draft -> active -> sold 순서로만 전이 가능
    pub fn can_transition_to(self, next: ListingStatus) -> bool {
        matches!(
            (self, next),
            (ListingStatus::Draft, ListingStatus::Active) | (ListingStatus::Active, ListingStatus::Sold)
        ) || self == next
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Draft => "draft",
            ListingStatus::Active => "active",
            ListingStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 상품 모델
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub images: Vec<String>,
    pub condition: String,
    pub description: String,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// 새 id 와 현재 시각으로 상품 생성
    pub fn new(
        title: impl Into<String>,
        price: f64,
        condition: impl Into<String>,
        description: impl Into<String>,
        status: ListingStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            price,
            images: Vec::new(),
            condition: condition.into(),
            description: description.into(),
            status,
            created_at: Utc::now(),
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// 부분 수정 적용. 지정된 필드만 통째로 교체한다.
    pub fn apply(&mut self, update: ListingUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        if let Some(condition) = update.condition {
            self.condition = condition;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

// 상품 등록 요청
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewListing {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub condition: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<ListingStatus>,
}

impl NewListing {
    /// id 가 없으면 새로 발급, 상태가 없으면 기본 상태 사용
    pub fn into_listing(self, default_status: ListingStatus) -> Listing {
        Listing {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: self.title,
            price: self.price,
            images: self.images,
            condition: self.condition,
            description: self.description,
            status: self.status.unwrap_or(default_status),
            created_at: Utc::now(),
        }
    }
}

// 상품 부분 수정 요청
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub status: Option<ListingStatus>,
}

// 상품 통계
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ListingStats {
    pub active_count: usize,
    pub sold_count: usize,
    pub sold_revenue: f64,
}
