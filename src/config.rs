use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "Clinica";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Calendar days scanned for bookable weekdays, starting today.
pub const DEFAULT_BOOKING_WINDOW_DAYS: u32 = 5;

/// How long a writer waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Get the application data directory
/// Platform data dir (e.g. ~/.local/share/Clinica), falling back to the working directory.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the clinic database file
pub fn database_path() -> PathBuf {
    app_data_dir().join("clinic.db")
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "clinica_lib=info,warn"
}

/// Runtime settings for the scheduling core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    pub database_path: PathBuf,
    pub booking_window_days: u32,
    pub busy_timeout_ms: u64,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            database_path: database_path(),
            booking_window_days: DEFAULT_BOOKING_WINDOW_DAYS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl ClinicConfig {
    /// Defaults overridden by `CLINICA_DB_PATH`, `CLINICA_BOOKING_WINDOW_DAYS`
    /// and `CLINICA_BUSY_TIMEOUT_MS` when set and parseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("CLINICA_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(days) = env_number("CLINICA_BOOKING_WINDOW_DAYS") {
            config.booking_window_days = days;
        }
        if let Some(ms) = env_number("CLINICA_BUSY_TIMEOUT_MS") {
            config.busy_timeout_ms = ms;
        }
        config
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable config override");
            None
        }
    }
}
