//! Local persistent session storage.
//!
//! The mobile client keeps small bits of session state in a flat JSON
//! key/value file; the signed-in user record lives under [`USER_KEY`]. The
//! sign-in flow writes it, this crate only reads it back.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::PersistedUser;
use crate::error::StorageError;

/// Fixed key the sign-in flow stores the current user under.
pub const USER_KEY: &str = "user";

/// File-backed string key/value store, one JSON object per file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default store location: `~/.carpool/session.json`.
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".carpool").join("session.json")
    }

    async fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StorageError::Malformed("store file is not a JSON object".to_string())),
            Err(e) => Err(StorageError::Malformed(e.to_string())),
        }
    }

    /// Fetch the raw string stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.read_all().await?;
        match map.get(key) {
            Some(Value::String(raw)) => Ok(Some(raw.clone())),
            Some(_) => Err(StorageError::Malformed(format!(
                "value under {:?} is not a string",
                key
            ))),
            None => Ok(None),
        }
    }

    /// Store `value` under `key`, creating the file (and parent directory) on
    /// first write. The sign-in flow is the writer; this crate only needs it
    /// for seeding test fixtures.
    #[allow(dead_code)]
    pub async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.read_all().await?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Read access to the signed-in user record, injectable so screens can be
/// tested against a fake.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn current_user(&self) -> Result<Option<PersistedUser>, StorageError>;
}

#[async_trait]
impl UserRepository for SessionStore {
    #[instrument(skip(self))]
    async fn current_user(&self) -> Result<Option<PersistedUser>, StorageError> {
        debug!("Reading stored user");
        match self.get(USER_KEY).await? {
            Some(raw) => {
                let user = serde_json::from_str(&raw)
                    .map_err(|e| StorageError::Malformed(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}
