//! Server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Settings for the web binary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Participant ids allowed to run admin actions (weekly start/advance, pool results).
    pub admin_ids: Vec<String>,
    /// Cookie signing key material; at least 64 bytes to be used.
    pub session_key: Option<String>,
    /// How often the background task checks the weekly schedule.
    pub weekly_check_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            admin_ids: Vec::new(),
            session_key: None,
            weekly_check_interval: Duration::from_secs(15 * 60),
        }
    }
}

/// Trimmed, non-empty env value.
pub fn env_default(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Comma-separated ids, blanks dropped.
pub fn parse_admin_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

impl ServerConfig {
    /// Read HOST, PORT, ADMIN_IDS, SESSION_KEY and WEEKLY_CHECK_SECS.
    pub fn from_env() -> Self {
        Self::from_lookup(env_default)
    }

    /// Build from any key lookup; unset or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            admin_ids: lookup("ADMIN_IDS")
                .map(|raw| parse_admin_ids(&raw))
                .unwrap_or(defaults.admin_ids),
            session_key: lookup("SESSION_KEY").filter(|k| k.len() >= 64),
            weekly_check_interval: lookup("WEEKLY_CHECK_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|&s| s > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.weekly_check_interval),
        }
    }

    pub fn is_admin(&self, participant_id: &str) -> bool {
        self.admin_ids.iter().any(|id| id == participant_id)
    }
}
