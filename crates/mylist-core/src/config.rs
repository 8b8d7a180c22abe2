//! Bot configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CoreError;
use crate::Result;

const ENV_DATABASE_PATH: &str = "MYLIST_DATABASE_PATH";
const ENV_SESSION_TTL: &str = "MYLIST_SESSION_TTL_SECS";
const ENV_REAP_INTERVAL: &str = "MYLIST_REAP_INTERVAL_SECS";
const ENV_LOG: &str = "MYLIST_LOG";

/// Upper bound for the TTL and reap interval: one day
const MAX_SECS: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// Idle time after which a staging session is reclaimed
    pub session_ttl_secs: u64,
    /// How often the reaper sweeps expired sessions
    pub reap_interval_secs: u64,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("mylist.db"),
            session_ttl_secs: 300,
            reap_interval_secs: 60,
            log_filter: "info".to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("mylist"))
            .unwrap_or_else(|| PathBuf::from(".mylist"))
    }

    /// Defaults overlaid with `MYLIST_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = lookup(ENV_DATABASE_PATH).filter(|p| !p.trim().is_empty()) {
            self.database_path = PathBuf::from(path.trim());
        }
        if let Some(raw) = lookup(ENV_SESSION_TTL) {
            self.session_ttl_secs = parse_secs(ENV_SESSION_TTL, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REAP_INTERVAL) {
            self.reap_interval_secs = parse_secs(ENV_REAP_INTERVAL, &raw)?;
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|f| !f.trim().is_empty()) {
            self.log_filter = filter.trim().to_string();
        }
        Ok(self)
    }

    /// Fails for a TTL outside `1..=86400` seconds.
    pub fn session_ttl(&self) -> Result<chrono::Duration> {
        check_range(ENV_SESSION_TTL, self.session_ttl_secs)?;
        i64::try_from(self.session_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| {
                CoreError::Config(format!(
                    "{ENV_SESSION_TTL} of {} seconds is out of range",
                    self.session_ttl_secs
                ))
            })
    }

    pub fn reap_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.reap_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    let secs = raw.trim().parse::<u64>().map_err(|e| {
        CoreError::Config(format!(
            "{key} must be a number of seconds, got `{raw}`: {e}"
        ))
    })?;
    check_range(key, secs)?;
    Ok(secs)
}

fn check_range(key: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(CoreError::Config(format!("{key} must be greater than zero")));
    }
    if secs > MAX_SECS {
        return Err(CoreError::Config(format!(
            "{key} must be at most {MAX_SECS} seconds, got {secs}"
        )));
    }
    Ok(())
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
    }
}
