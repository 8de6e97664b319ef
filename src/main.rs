// region:    --- Imports
use bid_ledger_service::config::Config;
use bid_ledger_service::router::create_router;
use bid_ledger_service::state::AppState;
use tokio::net::TcpListener;
use tokio::signal;
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
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 오류: {}", "Main", e);
            return Err(e.into());
        }
    };

    // 원장 저장소 초기화
    let state = match AppState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("{:<12} --> 원장 초기화 실패: {:?}", "Main", e);
            return Err(e);
        }
    };
    info!(
        "{:<12} --> 원장 초기화 성공 (스키마: {:?}, 시작가: {})",
        "Main", config.policy.schema, config.policy.starting_bid
    );

    // 라우터 설정
    let routes_all = create_router(state, &config.cors, config.body_limit);

    // 리스너 생성
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    info!("{:<12} --> 서버 종료", "Main");
    Ok(())
}
// endregion: --- Main

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("{:<12} --> Ctrl+C 핸들러 설치 실패: {}", "Main", e);
            std::future::pending::<()>().await;
        }
        info!("{:<12} --> Ctrl+C 수신, 종료 중", "Main");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("{:<12} --> SIGTERM 수신, 종료 중", "Main");
            }
            Err(e) => {
                error!("{:<12} --> 시그널 핸들러 설치 실패: {}", "Main", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
