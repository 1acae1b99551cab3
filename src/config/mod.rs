// region:    --- Imports
use crate::error::MarketError;
use std::net::SocketAddr;

// endregion: --- Imports

// region:    --- App Config
const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_BODY_LIMIT_MB: usize = 20;

/// 서버 설정 (환경 변수)
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// CHAT_MARKET_ADDR
    pub addr: SocketAddr,
    /// CHAT_MARKET_BODY_LIMIT_MB
    pub body_limit_bytes: usize,
    /// CHAT_MARKET_SEED_DEMO
    pub seed_demo_listings: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            body_limit_bytes: DEFAULT_BODY_LIMIT_MB * 1024 * 1024,
            seed_demo_listings: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, MarketError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 값 조회 함수로부터 설정 생성
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MarketError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("CHAT_MARKET_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr
            .parse()
            .map_err(|e| MarketError::Config(format!("CHAT_MARKET_ADDR={addr}: {e}")))?;

        let body_limit_mb = match lookup("CHAT_MARKET_BODY_LIMIT_MB") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                MarketError::Config(format!("CHAT_MARKET_BODY_LIMIT_MB={raw}: {e}"))
            })?,
            None => DEFAULT_BODY_LIMIT_MB,
        };

        let seed_demo_listings = match lookup("CHAT_MARKET_SEED_DEMO") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                MarketError::Config(format!("CHAT_MARKET_SEED_DEMO={raw}: true/false 만 허용"))
            })?,
            None => true,
        };

        let body_limit_bytes = body_limit_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            MarketError::Config(format!("CHAT_MARKET_BODY_LIMIT_MB={body_limit_mb}: 너무 큰 값"))
        })?;

        Ok(Self {
            addr,
            body_limit_bytes,
            seed_demo_listings,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
// endregion: --- App Config

// endregion: --- Tests
