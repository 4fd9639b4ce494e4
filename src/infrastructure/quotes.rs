//! # Quote API Client
//!
//! Fetches a random quote from ZenQuotes (`[{"q": ..., "a": ...}]`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::config::QuotesConfig;
use crate::domain::error::{BotError, BotResult};
use crate::domain::traits::QuoteSource;
use crate::domain::types::Quote;

const SERVICE: &str = "quotes";

pub struct ZenQuotesClient {
    http: Client,
    endpoint: String,
}

impl ZenQuotesClient {
    pub fn new(config: &QuotesConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl QuoteSource for ZenQuotesClient {
    async fn random_quote(&self) -> BotResult<Quote> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| BotError::external(SERVICE, e))?
            .error_for_status()
            .map_err(|e| BotError::external(SERVICE, e))?;

        let quotes: Vec<Quote> = response
            .json()
            .await
            .map_err(|e| BotError::external(SERVICE, e))?;

        first_quote(quotes)
    }
}

fn first_quote(quotes: Vec<Quote>) -> BotResult<Quote> {
    quotes
        .into_iter()
        .find(|q| !q.text.trim().is_empty())
        .ok_or_else(|| BotError::external(SERVICE, "empty response"))
}
