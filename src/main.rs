// region:    --- Imports
use chat_market::config::AppConfig;
use chat_market::context::AppContext;
use chat_market::events::{EventBroker, EventConsumer, EventLogger};
use chat_market::scheduler::ReplyScheduler;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 로드 실패: {}", "Main", e);
            return Err(e.into());
        }
    };
    info!("{:<12} --> 설정 로드 성공: {:?}", "Main", config);

    // 이벤트 발행기 및 애플리케이션 상태 생성
    let broker = EventBroker::new();
    let ctx = Arc::new(if config.seed_demo_listings {
        AppContext::with_demo_listings(broker.clone())
    } else {
        AppContext::with_broker(broker.clone())
    });

    // 이벤트 로그 소비자 시작
    let event_consumer = EventConsumer::new(&broker, Arc::new(EventLogger));
    tokio::spawn(async move {
        event_consumer.start().await;
    });

    // 답장 예약 스케줄러
    let scheduler = Arc::new(ReplyScheduler::new(Arc::clone(&ctx)));

    // 라우터 설정
    let routes_all = chat_market::build_router(ctx, scheduler, config.body_limit_bytes);

    // 리스너 생성
    let listener = TcpListener::bind(config.addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
