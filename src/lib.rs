pub mod authorization;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod records; // Lab results, medical records, prescriptions, patient history
pub mod scheduling; // Slot grid, availability, booking ledger

#[cfg(test)]
mod test_fixtures;

use tracing_subscriber::EnvFilter;

pub use authorization::Caller;
pub use config::ClinicConfig;
pub use error::{ClinicError, ConflictSide};

/// Install the fmt subscriber for hosts that have none.
///
/// `RUST_LOG` wins over `config::default_log_filter()`. A second call, or a
/// host that already installed a subscriber, is left alone.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
    }
}
