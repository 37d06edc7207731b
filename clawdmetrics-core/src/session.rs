//! Session record and its on-disk store
//!
//! The record is kept as the raw JSON object returned by the token endpoint so
//! that a save/load cycle reproduces it field for field. Typed accessors cover
//! the fields the commands actually read.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ClawdConfig;
use crate::error::ClawdError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionRecord(Map<String, Value>);

/// Identity block nested under `user`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser<'a> {
    pub id: Option<&'a str>,
    pub email: Option<&'a str>,
}

impl SessionRecord {
    /// Accepts only JSON objects.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn access_token(&self) -> Option<&str> {
        self.0.get("access_token").and_then(Value::as_str)
    }

    pub fn require_access_token(&self) -> Result<&str, ClawdError> {
        self.access_token()
            .filter(|t| !t.is_empty())
            .ok_or(ClawdError::SessionField {
                field: "access_token",
            })
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.0.get("refresh_token").and_then(Value::as_str)
    }

    pub fn expires_in(&self) -> Option<i64> {
        self.0.get("expires_in").and_then(Value::as_i64)
    }

    pub fn token_type(&self) -> Option<&str> {
        self.0.get("token_type").and_then(Value::as_str)
    }

    /// `None` when `user` is absent or not an object.
    pub fn user(&self) -> Option<SessionUser<'_>> {
        let user = self.0.get("user")?.as_object()?;
        Some(SessionUser {
            id: user.get("id").and_then(Value::as_str),
            email: user.get("email").and_then(Value::as_str),
        })
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user().and_then(|u| u.id)
    }
}

/// Single session file per machine. Not locked.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &ClawdConfig) -> Self {
        Self::new(config.session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the session file in full. Returns the written size in bytes.
    pub fn save(&self, record: &SessionRecord) -> Result<u64, ClawdError> {
        let io_err = |source| ClawdError::SessionIo {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let body = serde_json::to_string_pretty(record).map_err(|e| ClawdError::SessionCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&self.path, body).map_err(io_err)?;

        let size = fs::metadata(&self.path).map_err(io_err)?.len();
        tracing::debug!(path = %self.path.display(), size, "Session saved");
        Ok(size)
    }

    /// Field presence is the caller's concern; this only checks the file is a JSON object.
    pub fn load(&self) -> Result<SessionRecord, ClawdError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ClawdError::SessionMissing {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(ClawdError::SessionIo {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let value: Value = serde_json::from_str(&raw).map_err(|e| ClawdError::SessionCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        SessionRecord::from_value(value).map_err(|other| ClawdError::SessionCorrupt {
            path: self.path.clone(),
            reason: format!("expected an object, found {}", json_kind(&other)),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
