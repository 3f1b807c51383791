use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use crate::api::UsersApi;
use crate::error::ApiError;
use crate::notify::{Navigator, Notifier, Route};
use crate::screen_framework::{FormSnapshot, SubmitFlow, SubmitOutcome};

/// Fallback when a rejection carries no usable `detail` field.
const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Submit flow of the account-creation screen: send the full form, then hand
/// the user over to sign-in.
pub struct SignUpFlow {
    api: Arc<dyn UsersApi>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl SignUpFlow {
    pub fn new(
        api: Arc<dyn UsersApi>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { api, navigator, notifier }
    }
}

#[async_trait]
impl SubmitFlow for SignUpFlow {
    #[instrument(name = "sign_up_submit", skip(self, snapshot), fields(username = %snapshot.form.username))]
    async fn submit(&self, snapshot: FormSnapshot) -> SubmitOutcome {
        match self.api.create_user(&snapshot.form).await {
            Ok(()) => {
                info!("Account created");
                self.navigator.navigate(Route::SignIn);
                SubmitOutcome::Completed
            }
            Err(e @ ApiError::Rejected { .. }) => {
                error!(error = %e, "Sign up rejected");
                self.notifier.alert(e.detail().unwrap_or(UNKNOWN_ERROR));
                SubmitOutcome::Rejected
            }
            Err(e) => {
                error!(error = %e, "Sign up request failed");
                self.notifier.alert(UNKNOWN_ERROR);
                SubmitOutcome::Failed
            }
        }
    }
}
