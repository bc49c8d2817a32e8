use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use warehouse_front::{load_session, router, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let session = load_session(&config.session_path).await;
    if session.is_some() {
        info!("restored session from {}", config.session_path.display());
    }

    let addr = config.listen_addr();
    info!("backend at {}", config.api_url);
    let app = router(AppState::new(config, session));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
