//! # Mock Framework
//!
//! Test doubles for the screens' collaborators.
//!
//! The capability traits ([`UsersApi`], [`UserRepository`], [`Navigator`],
//! [`Notifier`]) are the seams: tests swap in these recording fakes and
//! assert on exactly what the flows sent, without any network or filesystem.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::oneshot;

use crate::api::UsersApi;
use crate::domain::{PersistedUser, UserProfileForm};
use crate::error::{ApiError, StorageError};
use crate::notify::{Navigator, Notifier, Route};
use crate::storage::UserRepository;

/// One request the fake API saw.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Create(Value),
    Update { id: String, body: Value },
}

/// Users API double: records every call and answers from a fixed script.
pub struct FakeUsersApi {
    calls: Mutex<Vec<RecordedCall>>,
    response: Option<ApiError>,
}

impl FakeUsersApi {
    pub fn succeeding() -> Self {
        Self { calls: Mutex::new(Vec::new()), response: None }
    }

    pub fn rejecting(status: u16, body: Value) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: Some(ApiError::Rejected { status, body }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: Some(ApiError::Transport(message.to_string())),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self) -> Result<(), ApiError> {
        match &self.response {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UsersApi for FakeUsersApi {
    async fn create_user(&self, form: &UserProfileForm) -> Result<(), ApiError> {
        let body = serde_json::to_value(form).expect("form serializes");
        self.calls.lock().unwrap().push(RecordedCall::Create(body));
        self.answer()
    }

    async fn update_user(&self, id: &str, body: &Map<String, Value>) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(RecordedCall::Update {
            id: id.to_string(),
            body: Value::Object(body.clone()),
        });
        self.answer()
    }
}

/// Users API double that never answers. It reports through the oneshot when a
/// request arrives, then parks forever; tests use it to catch a screen
/// tearing down with a submit still in flight.
pub struct StallingUsersApi {
    started: Mutex<Option<oneshot::Sender<()>>>,
}

impl StallingUsersApi {
    pub fn new(started: oneshot::Sender<()>) -> Self {
        Self { started: Mutex::new(Some(started)) }
    }

    async fn stall(&self) {
        if let Some(started) = self.started.lock().unwrap().take() {
            let _ = started.send(());
        }
        std::future::pending::<()>().await;
    }
}

#[async_trait]
impl UsersApi for StallingUsersApi {
    async fn create_user(&self, _form: &UserProfileForm) -> Result<(), ApiError> {
        self.stall().await;
        Ok(())
    }

    async fn update_user(&self, _id: &str, _body: &Map<String, Value>) -> Result<(), ApiError> {
        self.stall().await;
        Ok(())
    }
}

/// Repository double seeded with a stored user, nothing, or a read failure.
pub struct FakeRepository {
    result: Result<Option<PersistedUser>, StorageError>,
}

impl FakeRepository {
    pub fn empty() -> Self {
        Self { result: Ok(None) }
    }

    pub fn with_user(user: PersistedUser) -> Self {
        Self { result: Ok(Some(user)) }
    }

    pub fn broken(message: &str) -> Self {
        Self { result: Err(StorageError::Malformed(message.to_string())) }
    }
}

#[async_trait]
impl UserRepository for FakeRepository {
    async fn current_user(&self) -> Result<Option<PersistedUser>, StorageError> {
        self.result.clone()
    }
}

/// Notifier double collecting every alert message.
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

/// Navigator double collecting every route change.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// A fully populated stored user record for prefill tests.
pub fn stored_user(id: &str) -> PersistedUser {
    PersistedUser {
        id: id.to_string(),
        username: "bob".to_string(),
        first_name: "Bob".to_string(),
        last_name: "Builder".to_string(),
        email: "bob@example.com".to_string(),
        is_driver: false,
        phone_number: "123".to_string(),
        nid_passport: "NID-7".to_string(),
        address: "12 Main St".to_string(),
    }
}
