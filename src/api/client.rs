//! HTTP client for the twin backend.
//!
//! Authorized requests carry `Authorization: Bearer <access token>`. When
//! the backend answers 401 the client refreshes once and retries the request
//! once. If the refresh itself fails the session is cleared, so the user has
//! to log in again.

use std::fmt;
use std::path::PathBuf;

use log::{debug, info, warn};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use super::types::{
    AuthSession, ChatContext, ChatRequest, ChatResponse, DataConnection, ErrorBody,
    LoginCredentials, Token, User,
};
use crate::core::mood::Mood;

#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend answered with a non-2xx status.
    Api { status: u16, message: String },
    /// Response body did not match the expected shape.
    Parse(String),
    /// No saved session; run `twin login` first.
    NotLoggedIn,
    /// The refresh token was rejected. The session has been cleared.
    SessionExpired,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => write!(f, "API error (HTTP {status}): {message}"),
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::NotLoggedIn => write!(f, "not logged in (run `twin login`)"),
            ApiError::SessionExpired => {
                write!(f, "session expired, please log in again (run `twin login`)")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    session: Option<AuthSession>,
    /// Where the session is persisted. `None` keeps it in memory only.
    session_path: Option<PathBuf>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            session: None,
            session_path: None,
        }
    }

    /// Persists the session at `path`, restoring one saved there earlier.
    /// An unreadable file is logged and treated as logged out.
    pub fn with_session_file(mut self, path: PathBuf) -> Self {
        match AuthSession::load(&path) {
            Ok(session) => self.session = session,
            Err(e) => warn!("Ignoring unreadable session file {}: {}", path.display(), e),
        }
        self.session_path = Some(path);
        self
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn persist(&self) {
        let Some(path) = &self.session_path else {
            return;
        };
        let result = match &self.session {
            Some(session) => session.save(path),
            None => AuthSession::remove(path),
        };
        if let Err(e) = result {
            warn!("Failed to persist session to {}: {}", path.display(), e);
        }
    }

    fn set_tokens(&mut self, tokens: Token) {
        match self.session.as_mut() {
            Some(session) => session.tokens = tokens,
            None => {
                self.session = Some(AuthSession {
                    tokens,
                    user: None,
                })
            }
        }
        self.persist();
    }

    /// Logs in and caches the user's profile.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<User, ApiError> {
        info!("Logging in as {}", username);
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginCredentials { username, password })
            .send()
            .await?;
        let tokens: Token = parse(response).await?;
        self.set_tokens(tokens);
        self.me().await
    }

    /// Forgets the session locally. The backend keeps no server-side state.
    pub fn logout(&mut self) {
        if self.session.take().is_some() {
            info!("Logged out");
        }
        self.persist();
    }

    /// Fetches the profile and caches it in the session.
    pub async fn me(&mut self) -> Result<User, ApiError> {
        let user: User = parse(self.send_authorized(Method::GET, "/auth/me").await?).await?;
        if let Some(session) = self.session.as_mut() {
            session.user = Some(user.clone());
        }
        self.persist();
        Ok(user)
    }

    /// Trades the refresh token for a new access token. Any failure clears
    /// the session.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let refresh_token = self
            .session
            .as_ref()
            .ok_or(ApiError::NotLoggedIn)?
            .tokens
            .refresh_token
            .clone();
        let Some(refresh_token) = refresh_token else {
            warn!("No refresh token; clearing session");
            self.logout();
            return Err(ApiError::SessionExpired);
        };

        let result = async {
            let response = self
                .client
                .post(self.url("/auth/refresh"))
                .query(&[("refresh_token", refresh_token.as_str())])
                .send()
                .await?;
            parse::<Token>(response).await
        }
        .await;

        match result {
            Ok(mut tokens) => {
                // The backend may omit the refresh token; keep the one we have
                if tokens.refresh_token.is_none() {
                    tokens.refresh_token = Some(refresh_token);
                }
                debug!("Access token refreshed");
                self.set_tokens(tokens);
                Ok(())
            }
            Err(e) => {
                warn!("Token refresh failed ({}); clearing session", e);
                self.logout();
                Err(ApiError::SessionExpired)
            }
        }
    }

    pub async fn connections(&mut self) -> Result<Vec<DataConnection>, ApiError> {
        parse(self.send_authorized(Method::GET, "/data/connections").await?).await
    }

    pub async fn connect(&mut self, id: &str) -> Result<DataConnection, ApiError> {
        let path = format!("/data/connections/{id}/connect");
        parse(self.send_authorized(Method::POST, &path).await?).await
    }

    pub async fn disconnect(&mut self, id: &str) -> Result<DataConnection, ApiError> {
        let path = format!("/data/connections/{id}/disconnect");
        parse(self.send_authorized(Method::POST, &path).await?).await
    }

    /// Asks the conversation endpoint for a reply. The endpoint is open, but
    /// the access token goes along when there is one.
    pub async fn chat(&self, message: &str, mood: Mood) -> Result<String, ApiError> {
        let body = ChatRequest {
            message,
            context: ChatContext { mood },
        };
        let mut request = self.client.post(self.url("/conversation/chat")).json(&body);
        if let Some(session) = &self.session {
            request = request.bearer_auth(&session.tokens.access_token);
        }
        let reply: ChatResponse = parse(request.send().await?).await?;
        Ok(reply.response)
    }

    async fn send_once(&self, method: Method, path: &str) -> Result<reqwest::Response, ApiError> {
        let token = &self
            .session
            .as_ref()
            .ok_or(ApiError::NotLoggedIn)?
            .tokens
            .access_token;
        let response = self
            .client
            .request(method, self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        debug!("{} -> {}", path, response.status());
        Ok(response)
    }

    /// Sends with the access token, refreshing and retrying once on 401.
    async fn send_authorized(
        &mut self,
        method: Method,
        path: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self.send_once(method.clone(), path).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        info!("Access token rejected for {}; refreshing", path);
        self.refresh().await?;
        self.send_once(method, path).await
    }
}

/// Decodes a 2xx body as `T`, or turns the error body into `ApiError::Api`.
async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message())
            .unwrap_or(body);
        warn!("API error: {} - {}", status.as_u16(), message);
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}
