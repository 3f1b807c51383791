mod api;
mod config;
mod domain;
mod error;
mod flows;
mod notify;
mod screen_framework;
mod storage;

mod app_system;

#[cfg(test)]
mod mock_framework;

use std::sync::Arc;

use tracing::{info, Instrument};

use crate::api::HttpUsersApi;
use crate::app_system::{setup_tracing, ScreenSystem};
use crate::config::ClientConfig;
use crate::domain::{FieldDescriptor, FieldKind, FieldValue, FIELDS};
use crate::notify::TerminalShell;
use crate::storage::SessionStore;

/// Placeholder input a demo run types into one field.
fn demo_value(descriptor: &FieldDescriptor) -> FieldValue {
    match descriptor.kind {
        FieldKind::Flag => FieldValue::Flag(false),
        FieldKind::Secret => FieldValue::Text("demo-password".to_string()),
        FieldKind::Text => FieldValue::Text(format!("demo {}", descriptor.label)),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config =
        ClientConfig::load(&ClientConfig::default_path()).map_err(|e| e.to_string())?;
    info!(server = %config.server, "Starting carpool profile screens");

    let api = Arc::new(HttpUsersApi::new(config.server.clone()));
    let store = Arc::new(SessionStore::new(config.session_store_path()));
    let shell = Arc::new(TerminalShell);

    let navigator: Arc<dyn notify::Navigator> = shell.clone();
    let system = ScreenSystem::new(api, store, navigator, shell);

    // Walk the sign-up form the way a view would: one input per descriptor,
    // then a submit tap. Failures surface through the shell as alerts.
    let span = tracing::info_span!("sign_up_screen");
    async {
        info!("Filling sign-up form");
        for descriptor in FIELDS {
            system
                .sign_up
                .set_field(descriptor.key, demo_value(&descriptor))
                .await
                .map_err(|e| e.to_string())?;
        }
        let outcome = system.sign_up.submit().await.map_err(|e| e.to_string())?;
        info!(?outcome, "Sign up finished");
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    // Update screen: show what the loader seeded, then a submit tap. With no
    // stored user this stays local and alerts "User ID not found".
    let span = tracing::info_span!("update_profile_screen");
    async {
        let form = system.update_profile.snapshot().await.map_err(|e| e.to_string())?;
        info!(username = %form.username, "Update form prefilled");
        let outcome = system.update_profile.submit().await.map_err(|e| e.to_string())?;
        info!(?outcome, "Update finished");
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
