//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::replies::{Reply, ReplyError, ReplyRequest, ReplySource, ScriptedReplies};
use crate::core::state::App;

pub const TEST_GREETING: &str = "Hi, I'm Echo.";

/// A source that always errors.
pub struct FailingReplies;

#[async_trait]
impl ReplySource for FailingReplies {
    fn name(&self) -> &str {
        "failing"
    }

    async fn reply(&self, _request: ReplyRequest<'_>) -> Result<Reply, ReplyError> {
        Err(ReplyError::Backend("backend unavailable".into()))
    }
}

/// A source that takes `delay` to answer with a fixed text.
pub struct SlowReplies {
    pub delay: Duration,
}

#[async_trait]
impl ReplySource for SlowReplies {
    fn name(&self) -> &str {
        "slow"
    }

    async fn reply(&self, request: ReplyRequest<'_>) -> Result<Reply, ReplyError> {
        tokio::time::sleep(self.delay).await;
        Ok(Reply {
            text: format!("(late) {}", request.text),
            actions: Vec::new(),
        })
    }
}

/// Creates a test App named "Echo" answering from the scripted table.
pub fn test_app() -> App {
    test_app_with(Arc::new(ScriptedReplies::default()))
}

pub fn test_app_with(replies: Arc<dyn ReplySource>) -> App {
    App::new(replies, "Echo".to_string(), TEST_GREETING.to_string())
}
