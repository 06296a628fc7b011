//! # Backend API
//!
//! Client for the optional twin backend: account login with bearer tokens,
//! the user's third-party data connections and, when `[api] replies =
//! "backend"`, the conversation endpoint that answers chat messages.
//! Account calls are reached from the `twin login`, `twin whoami` and
//! `twin connections` subcommands.

mod client;
mod replies;
mod types;

pub use client::{ApiClient, ApiError};
pub use replies::ApiReplies;
pub use types::{
    AuthSession, ConnectionStatus, ConnectionType, DataConnection, LoginCredentials, Token, User,
};
