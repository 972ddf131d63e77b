use std::env;
use std::net::SocketAddr;

/// Built exactly once at process start and threaded through the call
/// graph via [`crate::state::AppState`]; nothing in this crate reads
/// `std::env` again after `main` (spec.md §9's module-level-mutable-state
/// redesign flag applies equally to configuration, not just lookup tables).
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub upload_api_key: String,
    pub webhook_url: Option<String>,
    pub decode_deadline_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("WRI_BIND_ADDR").ok().and_then(|s| s.parse().ok()).unwrap_or_else(|| ([0, 0, 0, 0], 8080).into()),
            upload_api_key: env::var("WRI_UPLOAD_API_KEY").unwrap_or_else(|_| "dev-key".to_string()),
            webhook_url: env::var("WRI_WEBHOOK_URL").ok(),
            decode_deadline_secs: env::var("WRI_DECODE_DEADLINE_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(30),
            max_upload_bytes: env::var("WRI_MAX_UPLOAD_BYTES").ok().and_then(|s| s.parse().ok()).unwrap_or(50 * 1024 * 1024),
        }
    }
}
