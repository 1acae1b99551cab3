/// 대본 기반 대화 진행기
/// 지금까지 주고받은 메시지 수와 대화 종류만으로 다음 안내 메시지를 고른다.
// region:    --- Imports
use super::model::FlowType;

// endregion: --- Imports

// region:    --- Script
pub const SELL_GREETING: &str = "Hi! I'm here to help you sell your item. What would you like to sell today? You can describe it or even upload a photo!";
pub const BUY_GREETING: &str =
    "Hi! I'm here to help you find what you're looking for. What are you trying to buy today?";

pub const SELL_CONDITION_QUESTION: &str = "Great! Can you tell me more about the condition of your item? Is it new, used, or refurbished?";
pub const SELL_PRICE_QUESTION: &str = "Perfect! What price are you thinking? I can help suggest a competitive price based on similar items.";
pub const SELL_COMPLETE: &str = "Excellent! I've gathered all the information needed. Your listing looks great and should attract buyers quickly!";
pub const SELL_FOLLOW_UP: &str =
    "I understand. Can you provide any additional details that might help buyers?";
pub const BUY_SEARCH_RESULTS: &str =
    "I'm searching for items that match your description. Here are some great options I found nearby!";

pub const SELL_QUICK_REPLIES: [&str; 4] = [
    "It's in excellent condition",
    "It's gently used",
    "It has some wear",
    "It's brand new",
];
pub const BUY_QUICK_REPLIES: [&str; 4] = [
    "Show me electronics",
    "Looking for furniture",
    "Need clothing items",
    "Show me everything",
];

/// 빠른 답장이 노출되는 최대 대화 길이(미만)
const QUICK_REPLY_WINDOW: usize = 6;

// endregion: --- Script

// region:    --- Stepper
/// 진행기가 고른 다음 안내 메시지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedReply {
    pub text: &'static str,
    /// 답장 이후 초안 준비 신호를 올릴지 여부
    pub raises_draft_ready: bool,
}

/// 대화 시작 인사
pub fn greeting(flow: FlowType) -> &'static str {
    match flow {
        FlowType::Sell => SELL_GREETING,
        FlowType::Buy => BUY_GREETING,
    }
}

/// 다음 안내 메시지 선택
/// `turn_count` 는 사용자가 메시지를 보내는 순간의(사용자 메시지 추가 전) 대화 길이다.
pub fn next_reply(flow: FlowType, turn_count: usize) -> ScriptedReply {
    match flow {
        FlowType::Sell => match turn_count {
            1 => ScriptedReply {
                text: SELL_CONDITION_QUESTION,
                raises_draft_ready: false,
            },
            3 => ScriptedReply {
                text: SELL_PRICE_QUESTION,
                raises_draft_ready: false,
            },
            5 => ScriptedReply {
                text: SELL_COMPLETE,
                raises_draft_ready: true,
            },
            _ => ScriptedReply {
                text: SELL_FOLLOW_UP,
                raises_draft_ready: false,
            },
        },
        // 구매 흐름은 단계 구분 없이 항상 같은 답장
        FlowType::Buy => ScriptedReply {
            text: BUY_SEARCH_RESULTS,
            raises_draft_ready: false,
        },
    }
}

/// 현재 대화 상태에서 노출할 빠른 답장 목록
pub fn quick_replies(flow: FlowType, turn_count: usize, draft_ready: bool) -> Vec<&'static str> {
    if turn_count == 0 || turn_count >= QUICK_REPLY_WINDOW || draft_ready {
        return Vec::new();
    }
    match flow {
        FlowType::Sell => SELL_QUICK_REPLIES.to_vec(),
        FlowType::Buy => BUY_QUICK_REPLIES.to_vec(),
    }
}

// endregion: --- Stepper

// endregion: --- Tests
