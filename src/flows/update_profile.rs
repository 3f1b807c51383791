use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::{error, info, instrument, warn};

use crate::api::UsersApi;
use crate::domain::UserProfileForm;
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::screen_framework::{FormSeed, FormSnapshot, SubmitFlow, SubmitOutcome};
use crate::storage::UserRepository;

const MISSING_USER_ID: &str = "User ID not found";
const UPDATED: &str = "Profile updated successfully";
const RETRY: &str = "Error updating profile, please try again";
const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Submit flow of the profile-update screen: prefill from the stored user,
/// then PATCH the edited fields to that user's endpoint.
pub struct UpdateProfileFlow {
    api: Arc<dyn UsersApi>,
    repository: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
}

impl UpdateProfileFlow {
    pub fn new(
        api: Arc<dyn UsersApi>,
        repository: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { api, repository, notifier }
    }
}

/// Shallow copy of the form for a partial update. An empty password is left
/// out entirely so the server does not clear the stored one.
fn update_body(form: &UserProfileForm) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("username".to_string(), json!(form.username));
    body.insert("first_name".to_string(), json!(form.first_name));
    body.insert("last_name".to_string(), json!(form.last_name));
    body.insert("email".to_string(), json!(form.email));
    body.insert("is_driver".to_string(), json!(form.is_driver));
    body.insert("phone_number".to_string(), json!(form.phone_number));
    body.insert("nid_passport".to_string(), json!(form.nid_passport));
    body.insert("address".to_string(), json!(form.address));
    if !form.password.is_empty() {
        body.insert("password".to_string(), json!(form.password));
    }
    body
}

/// Render the server's error payload for display; field-level errors arrive
/// as arbitrary JSON.
fn rejection_details(error: &ApiError) -> String {
    match error {
        ApiError::Rejected { body, .. } if !body.is_null() => {
            serde_json::to_string_pretty(body).unwrap_or_else(|_| UNKNOWN_ERROR.to_string())
        }
        _ => UNKNOWN_ERROR.to_string(),
    }
}

#[async_trait]
impl SubmitFlow for UpdateProfileFlow {
    /// Best-effort prefill: a missing or unreadable stored record simply
    /// means a blank form and no captured update target.
    #[instrument(name = "update_profile_prefill", skip(self))]
    async fn prefill(&self) -> FormSeed {
        match self.repository.current_user().await {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "Prefilled form from stored user");
                FormSeed {
                    form: UserProfileForm::from_persisted(&user),
                    user_id: Some(user.id),
                }
            }
            Ok(None) => FormSeed::default(),
            Err(e) => {
                warn!(error = %e, "Failed to load stored user");
                FormSeed::default()
            }
        }
    }

    #[instrument(name = "update_profile_submit", skip(self, snapshot), fields(user_id = ?snapshot.user_id))]
    async fn submit(&self, snapshot: FormSnapshot) -> SubmitOutcome {
        let user_id = match snapshot.user_id {
            Some(id) => id,
            None => {
                error!("No stored user id, refusing to submit");
                self.notifier.alert(MISSING_USER_ID);
                return SubmitOutcome::MissingUserId;
            }
        };

        let body = update_body(&snapshot.form);
        match self.api.update_user(&user_id, &body).await {
            Ok(()) => {
                info!("Profile updated");
                self.notifier.alert(UPDATED);
                SubmitOutcome::Completed
            }
            Err(e @ ApiError::Rejected { .. }) => {
                error!(error = %e, "Update rejected");
                let message = format!("Error updating profile:\n{}", rejection_details(&e));
                self.notifier.alert(&message);
                SubmitOutcome::Rejected
            }
            Err(e) => {
                error!(error = %e, "Update request failed");
                self.notifier.alert(RETRY);
                SubmitOutcome::Failed
            }
        }
    }
}
