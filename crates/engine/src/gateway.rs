//! Trait seams for the two external collaborators: the chat platform and the
//! memory service. Concrete REST clients live in their own crates; tests use
//! in-memory implementations.

use std::path::Path;

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

use crate::error::Result;

/// A chat channel, re-enumerated fresh every polling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// One immutable chat message as fetched from channel history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender_id: String,
    pub sender_username: String,
    pub channel_id: String,
    pub content: String,
    pub ts: DateTime<Utc>,
}

/// Identity attached to memorized content so retrieval stays user-scoped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryUser {
    pub user_id: String,
    pub username: String,
}

/// One retrieval query turn, chat-completion style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalQuery {
    pub role: String,
    pub content: String,
}

impl RetrievalQuery {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Filter narrowing retrieval to one user's memories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalScope {
    pub user_id: String,
}

/// A retrieved memory, most relevant first as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryItem {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Chat platform operations the engine depends on.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Enumerate the channels visible to the bot.
    async fn list_channels(&self) -> Result<Vec<Channel>>;

    /// Fetch messages for one channel in whatever order the platform
    /// returns them; `oldest` bounds the history server-side.
    async fn fetch_history(
        &self,
        channel_id: &str,
        oldest: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Message>>;

    /// Post a reply into a channel.
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<()>;
}

/// Memory service operations the engine depends on.
#[async_trait]
pub trait MemoryGateway: Send + Sync {
    /// Durably record the content behind `resource` as retrievable memory.
    async fn memorize(&self, resource: &Path, modality: &str, user: &MemoryUser) -> Result<()>;

    /// Return memories relevant to the queries, scoped to one user.
    async fn retrieve(
        &self,
        queries: &[RetrievalQuery],
        scope: &RetrievalScope,
    ) -> Result<Vec<MemoryItem>>;
}
