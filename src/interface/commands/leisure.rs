//! # Leisure Commands
//!
//! Handles `.quote` and the meme family (`.meme`, `.jjk`, `.one`, `.slayer`).

use anyhow::Result;

use crate::application::leisure::LeisureService;
use crate::domain::traits::ChatProvider;
use crate::domain::types::MemeQuery;
use crate::interface::commands::reply;
use crate::strings::messages;

pub async fn handle_quote(leisure: &LeisureService, chat: &impl ChatProvider) -> Result<()> {
    let result = leisure.quote().await.map(|q| messages::quote(&q));
    reply(chat, result).await
}

pub async fn handle_meme(leisure: &LeisureService, chat: &impl ChatProvider, query: MemeQuery) -> Result<()> {
    let result = leisure.meme(&query).await.map(|post| messages::meme(&post));
    reply(chat, result).await
}

/// Meme query behind each meme command.
pub fn meme_query(cmd: &str) -> Option<MemeQuery> {
    match cmd {
        ".meme" => Some(MemeQuery::Hot),
        ".jjk" => Some(MemeQuery::Search("Jujutsu Kaisen")),
        ".one" => Some(MemeQuery::Search("One Piece")),
        ".slayer" => Some(MemeQuery::Search("Demon Slayer")),
        _ => None,
    }
}
