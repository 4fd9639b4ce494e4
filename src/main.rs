//! # Main Entry Point
//!
//! Initializes the bot:
//! - Domain: Configuration, Types and Errors
//! - Infrastructure: Matrix, SQLite, Quote/Reddit clients, Presence, Liveness
//! - Application: Progression, Fitness, Goals, Time, Leisure, Reminders, Router
//! - Interface: Command Handlers
//!
#![recursion_limit = "256"]

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::SyncRoomMessageEvent,
    },
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::application::fitness::FitnessService;
use crate::application::goals::GoalService;
use crate::application::leisure::LeisureService;
use crate::application::progression::ProgressionService;
use crate::application::reminders::ReminderQueue;
use crate::application::router::{CommandRouter, Services};
use crate::application::state::BotState;
use crate::application::time::TimeService;
use crate::domain::config::AppConfig;
use crate::infrastructure::matrix::{MatrixNotifier, MatrixService};
use crate::infrastructure::quotes::ZenQuotesClient;
use crate::infrastructure::reddit::RedditClient;
use crate::infrastructure::storage::Database;
use crate::strings::logs;

#[derive(Parser, Debug)]
#[command(name = "levelup", about = "Gamified self-improvement bot for Matrix")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Logging Setup
    if !std::path::Path::new("data").exists() {
        fs::create_dir("data").context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = std::path::Path::new("data/session.log");
    if log_path.exists() {
        let _ = fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never("data", "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn,sqlx=warn",
        )
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting LevelUp...");

    // 2. Load Configuration
    let config = AppConfig::load(&args.config)?;
    tracing::info!("{}", logs::config_loaded(&config.services.matrix.username));

    // 3. Storage
    let db = Database::connect(&config.storage).await?;
    tracing::info!("{}", logs::database_ready(&config.storage.database_url));

    // 4. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .send()
        .await?;

    tracing::info!("{}", logs::LOGIN_SUCCESS);

    if let Some(name) = &config.services.matrix.display_name {
        tracing::info!("{}", logs::setting_display_name(name));
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("{}", logs::set_display_name_fail(&e.to_string()));
        }
    }

    // 5. Application Components
    if config.services.matrix.notify_room.is_none() {
        tracing::warn!("{}", logs::NO_NOTIFY_ROOM);
    }
    let notifier = Arc::new(MatrixNotifier::new(
        client.clone(),
        config.services.matrix.notify_room.as_deref(),
    )?);
    let progression = Arc::new(ProgressionService::new(db.clone(), notifier));
    let services = Services {
        fitness: Arc::new(FitnessService::new(progression.clone())),
        goals: Arc::new(GoalService::new(db)),
        time: Arc::new(TimeService::new(progression)),
        leisure: Arc::new(LeisureService::new(
            Arc::new(ZenQuotesClient::new(&config.services.quotes)?),
            Arc::new(RedditClient::new(&config.services.reddit)?),
        )),
        reminders: ReminderQueue::spawn(),
    };
    let state = Arc::new(Mutex::new(BotState::default()));
    let router = Arc::new(CommandRouter::new(services, state));

    // 6. Background Tasks
    let health_port = config.system.health_port;
    tokio::spawn(async move {
        if let Err(e) = crate::infrastructure::health::serve(health_port).await {
            tracing::error!("{}", logs::health_failed(&e.to_string()));
        }
    });

    tokio::spawn(crate::infrastructure::presence::rotate(
        client.clone(),
        config.system.statuses.clone(),
        Duration::from_secs(config.system.presence_interval_secs),
    ));

    // 7. Event Handlers
    let start_time = std::time::SystemTime::now();
    let loop_router = router.clone();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = loop_router.clone();

        async move {
            if let Some(original_msg) = ev.as_original() {
                // Ignore events older than start_time
                let ts = ev.origin_server_ts();
                let event_time =
                    std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
                if event_time < start_time {
                    return;
                }

                if let matrix_sdk::ruma::events::room::message::MessageType::Text(text_content) =
                    &original_msg.content.msgtype
                {
                    let body = &text_content.body;
                    tracing::debug!("Received message from {}: {}", original_msg.sender, body);
                    if original_msg.sender == room.own_user_id() {
                        return;
                    }

                    let chat = MatrixService::new(room);
                    if let Err(e) = router.route(&chat, body, original_msg.sender.as_str()).await {
                        tracing::error!("Failed to route message: {}", e);
                    }
                }
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("{}", logs::invite_received(room.room_id().as_str()));
            match room.join().await {
                Ok(_) => tracing::info!("{}", logs::JOIN_INVITE_SUCCESS),
                Err(e) => tracing::error!("{}", logs::join_invite_fail(&e.to_string())),
            }
        }
    });

    // 8. Sync until shutdown
    tracing::info!("{}", logs::SYNC_LOOP_START);
    let sync_client = client.clone();
    let sync_handle = tokio::spawn(async move { sync_client.sync(SyncSettings::default()).await });

    tokio::select! {
        result = sync_handle => match result {
            Ok(Err(e)) => tracing::error!("{}", logs::sync_loop_fail(&e.to_string())),
            Err(e) => tracing::error!("Matrix Sync Panic: {}", e),
            Ok(Ok(())) => {}
        },
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => tracing::info!("{}", logs::SHUTDOWN),
            Err(e) => tracing::error!("{}", logs::shutdown_fail(&e.to_string())),
        },
    }

    Ok(())
}
