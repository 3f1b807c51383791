use std::sync::Arc;

use tracing::{error, info};

use crate::api::UsersApi;
use crate::flows::{SignUpFlow, UpdateProfileFlow};
use crate::notify::{Navigator, Notifier};
use crate::screen_framework::{FormScreen, ScreenClient};
use crate::storage::UserRepository;

/// Both profile screens wired to their collaborators.
///
/// Responsible for starting the screen loops, handing out their clients, and
/// tearing everything down.
pub struct ScreenSystem {
    pub sign_up: ScreenClient,
    pub update_profile: ScreenClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ScreenSystem {
    pub fn new(
        api: Arc<dyn UsersApi>,
        repository: Arc<dyn UserRepository>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        // 1. Sign-up screen
        let flow = SignUpFlow::new(Arc::clone(&api), navigator, Arc::clone(&notifier));
        let (screen, sign_up) = FormScreen::new(32, flow);
        let sign_up_handle = tokio::spawn(screen.run());

        // 2. Update-profile screen
        let flow = UpdateProfileFlow::new(api, repository, notifier);
        let (screen, update_profile) = FormScreen::new(32, flow);
        let update_handle = tokio::spawn(screen.run());

        Self {
            sign_up,
            update_profile,
            handles: vec![sign_up_handle, update_handle],
        }
    }

    /// Tear both screens down: ask the loops to exit and wait for them.
    /// In-flight submits are aborted by the loops themselves.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down screens...");
        let _ = self.sign_up.shutdown().await;
        let _ = self.update_profile.shutdown().await;
        drop(self.sign_up);
        drop(self.update_profile);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Screen task failed: {:?}", e);
                return Err(format!("Screen task failed: {:?}", e));
            }
        }

        info!("Screen shutdown complete.");
        Ok(())
    }
}
