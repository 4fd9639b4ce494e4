//! In-memory fakes for the chat and content seams.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::error::BotResult;
use crate::domain::traits::{ChatProvider, MemeSource, Notifier, QuoteSource};
use crate::domain::types::{MemePost, MemeQuery, Quote};

/// Records room messages and notifications. Clones share the same log.
#[derive(Clone)]
pub struct RecordingChat {
    room_id: String,
    messages: Arc<Mutex<Vec<String>>>,
    notifications: Arc<Mutex<Vec<String>>>,
}

impl RecordingChat {
    pub fn new(room_id: &str) -> Self {
        Self {
            room_id: room_id.to_string(),
            messages: Arc::default(),
            notifications: Arc::default(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn last(&self) -> String {
        self.messages().last().cloned().unwrap_or_default()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for RecordingChat {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        let mut messages = self.messages.lock().unwrap();
        messages.push(content.to_string());
        Ok(format!("$event{}", messages.len()))
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        self.notifications.lock().unwrap().push(content.to_string());
        Ok(())
    }

    fn room_id(&self) -> String {
        self.room_id.clone()
    }
}

#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, content: &str) -> Result<(), String> {
        self.sent.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

pub struct StaticQuotes {
    quote: Quote,
}

impl StaticQuotes {
    pub fn new(text: &str, author: &str) -> Self {
        Self {
            quote: Quote {
                text: text.to_string(),
                author: author.to_string(),
            },
        }
    }
}

#[async_trait]
impl QuoteSource for StaticQuotes {
    async fn random_quote(&self) -> BotResult<Quote> {
        Ok(self.quote.clone())
    }
}

pub struct StaticMemes {
    posts: Vec<MemePost>,
}

impl StaticMemes {
    pub fn new(posts: Vec<MemePost>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl MemeSource for StaticMemes {
    async fn fetch_posts(&self, _query: &MemeQuery, limit: u32) -> BotResult<Vec<MemePost>> {
        Ok(self.posts.iter().take(limit as usize).cloned().collect())
    }
}
