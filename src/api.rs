use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::UserProfileForm;
use crate::error::ApiError;

/// The remote users API as the client sees it. Screens depend on this trait
/// so tests can swap in a fake.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// `POST /api/users/` with the full nine-field form.
    async fn create_user(&self, form: &UserProfileForm) -> Result<(), ApiError>;

    /// `PATCH /api/users/{id}/` with a partial body.
    async fn update_user(&self, id: &str, body: &Map<String, Value>) -> Result<(), ApiError>;
}

/// Production implementation over HTTP.
pub struct HttpUsersApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUsersApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Map a non-success response to a rejection carrying the decoded error
    /// payload, or `Value::Null` when the body is absent or not JSON.
    async fn rejection(resp: reqwest::Response) -> ApiError {
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        ApiError::Rejected { status, body }
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    #[instrument(skip(self, form), fields(username = %form.username))]
    async fn create_user(&self, form: &UserProfileForm) -> Result<(), ApiError> {
        debug!("Sending request");
        let url = format!("{}/api/users/", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(form)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if resp.status().is_success() {
            return Ok(());
        }
        Err(Self::rejection(resp).await)
    }

    #[instrument(skip(self, body))]
    async fn update_user(&self, id: &str, body: &Map<String, Value>) -> Result<(), ApiError> {
        debug!("Sending request");
        let url = format!("{}/api/users/{}/", self.base_url, id);
        let resp = self
            .client
            .patch(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if resp.status().is_success() {
            return Ok(());
        }
        Err(Self::rejection(resp).await)
    }
}
