//! ju2api 服务入口

use ju2api::config::LISTEN_PORT;
use ju2api::server::{create_router, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ju2api=info,axum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = create_router(AppState::new());

    let addr = SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT));
    tracing::info!("Server listening on port {}", LISTEN_PORT);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
