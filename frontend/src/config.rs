use chrono::Duration;

#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

pub const THOUGHT_CHAT_PATH: &str = "/api/thought-chat";

/// Local snapshots older than this are never offered for resume.
pub fn snapshot_ttl() -> Duration {
    Duration::hours(2)
}

pub fn thought_chat_url(endpoint: &str) -> String {
    format!("{}{}/{}", get_backend_url(), THOUGHT_CHAT_PATH, endpoint)
}
