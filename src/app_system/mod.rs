//! System orchestration, startup, and shutdown logic.

pub mod screen_system;

pub use screen_system::*;

use tracing_subscriber::EnvFilter;

/// Setup tracing once for the entire application.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
