//! Score service binary: serves the submission and leaderboard API.

use std::net::SocketAddr;
use std::time::Duration;

use snake_arcade::config::{RATE_LIMIT_WINDOW_MS, SERVER_PORT};
use snake_arcade::{http, AppState};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snake_arcade=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new();

    // Expired admission-control windows are swept in the background
    let maintenance = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(RATE_LIMIT_WINDOW_MS));
        loop {
            interval.tick().await;
            maintenance.submission.rate_limiter().prune_expired();
        }
    });

    let app = http::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], SERVER_PORT));
    tracing::info!("score service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
