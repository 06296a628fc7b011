//! Wire types for the twin backend.
//!
//! Timestamps arrive as naive ISO 8601 strings in UTC (no offset), so they
//! are modelled as `NaiveDateTime`.

use std::fmt;
use std::io;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::mood::Mood;
use crate::core::storage::{atomic_write_json, read_json_or_default};

/// Body of `POST /auth/login`. `username` may also be an email address.
#[derive(Serialize, Debug, Clone)]
pub struct LoginCredentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Returned by login and refresh.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_at: NaiveDateTime,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_token_type() -> String {
    String::from("bearer")
}

/// Public profile from `GET /auth/me`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub last_login: Option<NaiveDateTime>,
}

fn default_true() -> bool {
    true
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Spotify,
    GoogleCalendar,
    GoogleFit,
    Twitter,
    Facebook,
    AppleHealth,
    Fitbit,
    Github,
    Notion,
    CustomApi,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Pending,
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Error => "error",
        };
        f.write_str(label)
    }
}

/// A third-party data source linked to the account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataConnection {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConnectionType,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ConnectionStatus,
    #[serde(default)]
    pub connected_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_sync: Option<NaiveDateTime>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl DataConnection {
    /// One line for `twin connections list`.
    pub fn summary(&self) -> String {
        let mut line = format!("{:<14} {:<24} {}", self.id, self.name, self.status);
        if let Some(error) = &self.error_message {
            line.push_str(&format!(" ({error})"));
        }
        line
    }
}

/// Body of `POST /conversation/chat`.
#[derive(Serialize, Debug, Clone)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
    pub context: ChatContext,
}

#[derive(Serialize, Debug, Clone)]
pub(crate) struct ChatContext {
    pub mood: Mood,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ChatResponse {
    pub response: String,
}

/// Error body: `{"detail": "..."}`. Validation errors carry a list instead
/// of a string.
#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}

/// Tokens plus the cached profile, persisted between runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub tokens: Token,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthSession {
    /// Saved session at `path`, or `None` when logged out.
    pub fn load(path: &Path) -> io::Result<Option<AuthSession>> {
        read_json_or_default(path)
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        atomic_write_json(path, self)
    }

    /// Removes the saved session. A missing file is not an error.
    pub fn remove(path: &Path) -> io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
