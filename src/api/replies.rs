//! Twin replies from the backend's conversation endpoint.

use async_trait::async_trait;
use log::warn;

use super::client::ApiClient;
use crate::core::replies::{Reply, ReplyError, ReplyRequest, ReplySource, ReplyTable};

/// Takes the reply text from the backend. Suggested actions still come
/// from the local rule table, since the backend only returns text.
pub struct ApiReplies {
    client: ApiClient,
    table: ReplyTable,
}

impl ApiReplies {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            table: ReplyTable::default(),
        }
    }
}

#[async_trait]
impl ReplySource for ApiReplies {
    fn name(&self) -> &str {
        "backend"
    }

    async fn reply(&self, request: ReplyRequest<'_>) -> Result<Reply, ReplyError> {
        let text = self
            .client
            .chat(request.text, request.mood)
            .await
            .map_err(|e| {
                warn!("Backend reply failed: {}", e);
                ReplyError::Backend(e.to_string())
            })?;
        Ok(Reply {
            text,
            actions: self.table.actions_for(request.text),
        })
    }
}
