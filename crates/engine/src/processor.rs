//! Per-message pipeline: memorize, retrieve, reply.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::{
    artifact::WorkingArtifact,
    error::Result,
    gateway::{ChatGateway, MemoryGateway, MemoryItem, MemoryUser, Message, RetrievalQuery,
              RetrievalScope},
};

/// Reply posted when memorize or retrieve fails for a message.
pub const APOLOGY_REPLY: &str = "An error occurred while processing your request.";

/// Reply posted when retrieval finds nothing for the sender yet.
pub const NO_CONTEXT_REPLY: &str = "I don't have any relevant memories for that.";

const MODALITY_CONVERSATION: &str = "conversation";

/// How many retrieved memories feed one reply.
const REPLY_SOURCE_LIMIT: usize = 3;

/// What processing one message amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// The bot's own post; ignored to prevent feedback loops.
    SelfMessage,
    /// A reply was posted (synthesized, no-context, or apology).
    Replied { text: String },
}

/// Turns one raw message into a memorized record and a posted reply.
///
/// Memory-side failures never escape: they collapse into the apology reply so
/// every non-self message still produces exactly one outbound post. Only the
/// post itself is allowed to fail upward, since an undeliverable reply has no
/// local remedy.
pub struct MessageProcessor<C, M> {
    chat: Arc<C>,
    memory: Arc<M>,
    bot_username: String,
}

impl<C: ChatGateway, M: MemoryGateway> MessageProcessor<C, M> {
    pub fn new(chat: Arc<C>, memory: Arc<M>, bot_username: impl Into<String>) -> Self {
        Self {
            chat,
            memory,
            bot_username: bot_username.into(),
        }
    }

    pub async fn process(&self, message: &Message) -> Result<ProcessingOutcome> {
        if message.sender_username == self.bot_username {
            debug!(channel = %message.channel_id, "ignoring own message");
            return Ok(ProcessingOutcome::SelfMessage);
        }

        info!(
            user = %message.sender_username,
            channel = %message.channel_id,
            ts = %message.ts,
            "processing message"
        );

        // The working artifact is scoped to this call and dropped before the
        // reply is posted.
        let reply = self.synthesize_reply(message).await;

        self.chat.post_message(&message.channel_id, &reply).await?;
        info!(channel = %message.channel_id, "posted reply");

        Ok(ProcessingOutcome::Replied { text: reply })
    }

    /// Memorize the message and compose a reply from retrieved memories.
    /// Infallible by construction: every failure path yields the apology text.
    async fn synthesize_reply(&self, message: &Message) -> String {
        let user = MemoryUser {
            user_id: message.sender_id.clone(),
            username: message.sender_username.clone(),
        };

        let artifact = match WorkingArtifact::write(&message.content) {
            Ok(artifact) => artifact,
            Err(e) => {
                error!(user = %user.user_id, error = %e, "failed to stage message content");
                return APOLOGY_REPLY.into();
            },
        };

        if let Err(e) = self
            .memory
            .memorize(artifact.path(), MODALITY_CONVERSATION, &user)
            .await
        {
            error!(user = %user.user_id, error = %e, "memorize failed");
            return APOLOGY_REPLY.into();
        }
        debug!(user = %user.user_id, "message memorized");

        let queries = [RetrievalQuery::user(message.content.clone())];
        let scope = RetrievalScope {
            user_id: message.sender_id.clone(),
        };

        match self.memory.retrieve(&queries, &scope).await {
            Ok(items) if items.is_empty() => NO_CONTEXT_REPLY.into(),
            Ok(items) => {
                debug!(user = %user.user_id, count = items.len(), "retrieved memories");
                compose_reply(&items)
            },
            Err(e) => {
                error!(user = %user.user_id, error = %e, "retrieve failed");
                APOLOGY_REPLY.into()
            },
        }
    }
}

/// Join the most relevant summaries into one reply, gateway order preserved.
fn compose_reply(items: &[MemoryItem]) -> String {
    items
        .iter()
        .take(REPLY_SOURCE_LIMIT)
        .map(|item| item.summary.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
