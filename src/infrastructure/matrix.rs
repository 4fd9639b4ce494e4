//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for a joined Matrix room and the
//! `Notifier` trait for the configured broadcast room, using `matrix_sdk`.

use crate::domain::traits::{ChatProvider, Notifier};
use anyhow::{Context, Result};
use async_trait::async_trait;
use matrix_sdk::Client;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::room::message::RoomMessageEventContent;
use matrix_sdk::ruma::{OwnedRoomId, RoomId};

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        self.room
            .send(RoomMessageEventContent::notice_markdown(content))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Posts announcements to the broadcast room. Without a configured room the
/// notices are only logged.
pub struct MatrixNotifier {
    client: Client,
    room_id: Option<OwnedRoomId>,
}

impl MatrixNotifier {
    pub fn new(client: Client, room_id: Option<&str>) -> Result<Self> {
        let room_id = room_id
            .map(|id| RoomId::parse(id).with_context(|| format!("Invalid notify_room '{id}'")))
            .transpose()?;
        Ok(Self { client, room_id })
    }
}

#[async_trait]
impl Notifier for MatrixNotifier {
    async fn notify(&self, content: &str) -> Result<(), String> {
        let Some(room_id) = &self.room_id else {
            tracing::info!("Announcement (no notify room): {}", content);
            return Ok(());
        };
        let room = self
            .client
            .get_room(room_id)
            .ok_or_else(|| format!("Bot is not a member of {room_id}"))?;
        MatrixService::new(room).send_message(content).await.map(|_| ())
    }
}
