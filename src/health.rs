use std::net::SocketAddr;

use axum::{Router, routing::get};

async fn home() -> &'static str {
    "🤖 Kaddelo Bot is running! ✅"
}

async fn health() -> &'static str {
    "OK"
}

async fn status() -> &'static str {
    "Bot is alive and responding to Telegram"
}

fn router() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/status", get(status))
}

/// Uptime-probe endpoint. Runs on its own task, shares no state with the
/// bot; losing it degrades monitoring only, so bind errors do not stop
/// the process.
pub async fn run(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind health endpoint on {}: {}", addr, e);
            return;
        }
    };
    log::info!("Health endpoint listening on {}", addr);

    if let Err(e) = axum::serve(listener, router()).await {
        log::error!("Health endpoint terminated: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_bodies_are_stable() {
        assert_eq!(health().await, "OK");
        assert_eq!(status().await, "Bot is alive and responding to Telegram");
        assert!(home().await.contains("Kaddelo Bot"));
    }
}
