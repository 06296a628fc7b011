//! # Core Application Logic
//!
//! The twin's business logic. It knows nothing about any specific UI
//! technology and never sleeps: timers are requested as effects and carried
//! out by the adapter.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (App)          │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Effect (requests)    │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  storage   │      │    API     │
//!     │  Adapter   │      │ ~/.twin/*  │      │  (backend) │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all session state in one place
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`message`]: Transcript, message ids and delivery status
//! - [`mood`]: Mood enum and keyword classifier
//! - [`replies`]: Ordered reply rules and the `ReplySource` trait
//! - [`avatar`]: Avatar appearance record
//! - [`checkin`]: Mood check-in log, stats and streaks
//! - [`simulation`]: "What if" forecasts
//! - [`command`]: Slash command parsing
//! - [`config`]: `~/.twin/config.toml`
//! - [`storage`]: JSON documents under `~/.twin/`

pub mod action;
pub mod avatar;
pub mod checkin;
pub mod command;
pub mod config;
pub mod keywords;
pub mod message;
pub mod mood;
pub mod replies;
pub mod simulation;
pub mod state;
pub mod storage;
