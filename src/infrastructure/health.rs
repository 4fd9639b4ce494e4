//! # Liveness Endpoint
//!
//! Minimal HTTP server answering `GET /` so hosting platforms can probe the bot.

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;

pub const ALIVE: &str = "Bot is alive!";

pub fn routes() -> Router {
    Router::new().route("/", get(alive))
}

async fn alive() -> &'static str {
    ALIVE
}

/// Serves the liveness routes until the process exits.
pub async fn serve(port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("{}", crate::strings::logs::health_listening(port));
    axum::serve(listener, routes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_alive_body() {
        assert_eq!(alive().await, "Bot is alive!");
    }

    #[tokio::test]
    async fn test_serves_on_ephemeral_port() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, routes()).await });

        let body = reqwest::get(format!("http://{addr}/")).await.unwrap().text().await.unwrap();
        assert_eq!(body, ALIVE);
    }
}
