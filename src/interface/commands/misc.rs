//! # Miscellaneous Commands
//!
//! Handles `.hello` and `.help`.

use crate::domain::traits::ChatProvider;
use anyhow::Result;

pub async fn handle_hello(chat: &impl ChatProvider, sender: &str) -> Result<()> {
    chat.send_message(&crate::strings::messages::hello(sender))
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}

pub async fn handle_help(chat: &impl ChatProvider) -> Result<()> {
    chat.send_message(crate::strings::help::MAIN).await.map(|_| ()).map_err(|e| anyhow::anyhow!(e))
}
