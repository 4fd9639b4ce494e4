pub fn config_loaded(user: &str) -> String {
    format!("Loaded configuration for user: {user}")
}

pub const LOGIN_SUCCESS: &str = "Logged in successfully!";

pub fn setting_display_name(name: &str) -> String {
    format!("Setting display name to: {name}")
}

pub fn set_display_name_fail(err: &str) -> String {
    format!("Failed to set display name: {err}")
}

pub const SYNC_LOOP_START: &str = "Starting sync loop...";

pub fn sync_loop_fail(err: &str) -> String {
    format!("Sync loop failed: {err}")
}

pub const SHUTDOWN: &str = "Shutting down...";

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}

pub fn invite_received(room_id: &str) -> String {
    format!("💌 Received invite for room {room_id:?}")
}

pub fn join_invite_fail(err: &str) -> String {
    format!("Failed to join room after invite: {err}")
}

pub const JOIN_INVITE_SUCCESS: &str = "✅ Successfully joined room!";

pub fn database_ready(url: &str) -> String {
    format!("Database ready at {url}")
}

pub fn health_listening(port: u16) -> String {
    format!("Liveness endpoint listening on 0.0.0.0:{port}")
}

pub fn health_failed(err: &str) -> String {
    format!("Liveness endpoint stopped: {err}")
}

pub fn presence_failed(err: &str) -> String {
    format!("Failed to update presence: {err}")
}

pub const NO_NOTIFY_ROOM: &str = "No notify_room configured; level-up announcements are disabled";
