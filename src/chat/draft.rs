/// 초안 상태 및 대화 내용으로부터 초안 생성
// region:    --- Imports
use super::model::{ChatMessage, Sender};
use crate::listing::model::{Listing, ListingStatus};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// endregion: --- Imports

// region:    --- Draft Phase
/// 초안 진행 단계
/// none -> drafting -> ready -> active, ready -> none(폐기), ready -> drafting(대화로 수정)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DraftPhase {
    #[default]
    None,
    Drafting,
    Ready,
    Active,
}

impl DraftPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            DraftPhase::None => "none",
            DraftPhase::Drafting => "drafting",
            DraftPhase::Ready => "ready",
            DraftPhase::Active => "active",
        }
    }
}

// endregion: --- Draft Phase

// region:    --- Draft Composition
const MAX_TITLE_CHARS: usize = 80;

static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?")
        .expect("가격 정규식은 항상 유효하다")
});

/// 메시지에서 첫 번째 숫자를 가격으로 추출
/// 세 자리 단위 `,` 는 천 단위 구분자, 소수점은 `.` 만 인정한다.
pub fn extract_price(text: &str) -> Option<f64> {
    PRICE_PATTERN
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
}

fn truncate_title(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    line.chars().take(MAX_TITLE_CHARS).collect()
}

/// 판매 대화의 사용자 답변으로 초안 생성
/// 첫 답변: 제목/설명, 두 번째: 상태, 세 번째 이후: 가격(첫 숫자), 네 번째 이후: 설명에 덧붙임
pub fn compose_draft(transcript: &[ChatMessage]) -> Listing {
    let answers: Vec<&ChatMessage> = transcript
        .iter()
        .filter(|m| m.sender == Sender::User)
        .collect();

    let first = answers.first().map(|m| m.content.trim()).unwrap_or("");
    let condition = answers
        .get(1)
        .map(|m| m.content.trim().to_string())
        .unwrap_or_default();
    let price = answers
        .iter()
        .skip(2)
        .find_map(|m| extract_price(&m.content))
        .unwrap_or(0.0);

    let mut description = first.to_string();
    for extra in answers.iter().skip(3) {
        let text = extra.content.trim();
        if !text.is_empty() {
            if !description.is_empty() {
                description.push('\n');
            }
            description.push_str(text);
        }
    }

    let images: Vec<String> = answers
        .iter()
        .flat_map(|m| m.image_refs().iter().cloned())
        .collect();

    Listing::new(
        truncate_title(first),
        price,
        condition,
        description,
        ListingStatus::Draft,
    )
    .with_images(images)
}

/// 대화로 수정하는 경우 기존 초안 내용은 유지하고 수정 요청을 설명에 덧붙인다.
pub fn revise_draft(draft: &mut Listing, revision: &ChatMessage) {
    let text = revision.content.trim();
    if !text.is_empty() {
        if !draft.description.is_empty() {
            draft.description.push('\n');
        }
        draft.description.push_str(text);
    }
    draft.images.extend(revision.image_refs().iter().cloned());
    draft.status = ListingStatus::Draft;
}

// endregion: --- Draft Composition

// endregion: --- Tests
