//! # Reddit Client
//!
//! Pulls meme listings from a subreddit. Uses app-only OAuth (client
//! credentials) when an app id/secret is configured, and the public JSON
//! listing otherwise.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::domain::config::RedditConfig;
use crate::domain::error::{BotError, BotResult};
use crate::domain::traits::MemeSource;
use crate::domain::types::{MemePost, MemeQuery};

const SERVICE: &str = "reddit";
const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const OAUTH_BASE: &str = "https://oauth.reddit.com";
const PUBLIC_BASE: &str = "https://www.reddit.com";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: MemePost,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expiry")]
    expires_in: u64,
}

fn default_expiry() -> u64 {
    3600
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

pub struct RedditClient {
    http: Client,
    config: RedditConfig,
    token: Mutex<Option<AccessToken>>,
}

impl RedditClient {
    pub fn new(config: &RedditConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            config: config.clone(),
            token: Mutex::new(None),
        })
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.config.client_id, &self.config.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }

    /// Returns a bearer token, refreshing it a minute before expiry.
    async fn access_token(&self, id: &str, secret: &str) -> BotResult<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.value.clone());
        }

        let response: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .basic_auth(id, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| BotError::external(SERVICE, e))?
            .error_for_status()
            .map_err(|e| BotError::external(SERVICE, e))?
            .json()
            .await
            .map_err(|e| BotError::external(SERVICE, e))?;

        let lifetime = Duration::from_secs(response.expires_in.saturating_sub(60));
        *guard = Some(AccessToken {
            value: response.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(response.access_token)
    }
}

/// Listing path (without host) for a query.
fn listing_path(subreddit: &str, query: &MemeQuery, oauth: bool) -> String {
    let suffix = if oauth { "" } else { ".json" };
    match query {
        MemeQuery::Hot => format!("/r/{subreddit}/hot{suffix}"),
        MemeQuery::Search(_) => format!("/r/{subreddit}/search{suffix}"),
    }
}

fn parse_listing(body: &str) -> BotResult<Vec<MemePost>> {
    let listing: Listing = serde_json::from_str(body).map_err(|e| BotError::external(SERVICE, e))?;
    Ok(listing.data.children.into_iter().map(|c| c.data).collect())
}

#[async_trait]
impl MemeSource for RedditClient {
    async fn fetch_posts(&self, query: &MemeQuery, limit: u32) -> BotResult<Vec<MemePost>> {
        let oauth = self.credentials();
        let base = if oauth.is_some() { OAUTH_BASE } else { PUBLIC_BASE };
        let url = format!(
            "{}{}",
            base,
            listing_path(&self.config.subreddit, query, oauth.is_some())
        );

        let mut params = vec![("limit", limit.to_string()), ("raw_json", "1".to_string())];
        if let MemeQuery::Search(term) = query {
            params.push(("q", term.to_string()));
            params.push(("restrict_sr", "1".to_string()));
        }

        let mut request = self.http.get(&url).query(&params);
        if let Some((id, secret)) = oauth {
            let token = self.access_token(id, secret).await?;
            request = request.bearer_auth(token);
        }

        tracing::debug!("Fetching {} ({})", url, query.label());
        let body = request
            .send()
            .await
            .map_err(|e| BotError::external(SERVICE, e))?
            .error_for_status()
            .map_err(|e| BotError::external(SERVICE, e))?
            .text()
            .await
            .map_err(|e| BotError::external(SERVICE, e))?;

        parse_listing(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_path() {
        assert_eq!(listing_path("memes", &MemeQuery::Hot, true), "/r/memes/hot");
        assert_eq!(listing_path("memes", &MemeQuery::Hot, false), "/r/memes/hot.json");
        assert_eq!(
            listing_path("memes", &MemeQuery::Search("One Piece"), false),
            "/r/memes/search.json"
        );
    }

    #[test]
    fn test_parse_listing() {
        let body = r#"{
            "kind": "Listing",
            "data": {
                "after": null,
                "children": [
                    {"kind": "t3", "data": {"url": "https://i.redd.it/x.png", "over_18": false, "author": "ann", "title": "x"}},
                    {"kind": "t3", "data": {"url": "https://example.com/post", "over_18": true, "author": null}}
                ]
            }
        }"#;
        let posts = parse_listing(body).unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts[0].is_postable());
        assert!(!posts[1].is_postable());
    }

    #[test]
    fn test_parse_listing_rejects_garbage() {
        assert!(matches!(parse_listing("<html>"), Err(BotError::ExternalService { .. })));
    }

    #[test]
    fn test_credentials_require_both_values() {
        let mut config = RedditConfig::default();
        config.client_id = Some("id".into());
        let client = RedditClient::new(&config).unwrap();
        assert!(client.credentials().is_none());

        config.client_secret = Some("secret".into());
        let client = RedditClient::new(&config).unwrap();
        assert_eq!(client.credentials(), Some(("id", "secret")));
    }
}
