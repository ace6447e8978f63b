//! The polling loop: enumerate channels, fetch history past the watermark,
//! process new messages strictly sequentially, sleep, repeat.

use std::{sync::Arc, time::Duration};

use {
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::{
    error::Result,
    gateway::{ChatGateway, MemoryGateway, Message},
    processor::MessageProcessor,
    watermark::Watermark,
};

/// Default pause between polling cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// History page size per channel fetch.
const HISTORY_PAGE_SIZE: u32 = 100;

/// Stateful polling engine over a chat gateway and a memory gateway.
///
/// Fault isolation, outermost to innermost: a failed cycle is logged and
/// retried after the sleep; a failed channel fetch skips that channel only;
/// per-message failures are absorbed by the processor as apology replies.
/// Nothing short of cancellation stops the loop.
pub struct Engine<C, M> {
    chat: Arc<C>,
    processor: MessageProcessor<C, M>,
    watermark: Watermark,
    poll_interval: Duration,
}

impl<C: ChatGateway, M: MemoryGateway> Engine<C, M> {
    /// Build an engine whose watermark starts at the current time, so only
    /// messages posted after startup are ever processed.
    pub fn new(chat: Arc<C>, memory: Arc<M>, bot_username: impl Into<String>) -> Self {
        let processor = MessageProcessor::new(Arc::clone(&chat), memory, bot_username);
        Self {
            chat,
            processor,
            watermark: Watermark::now(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_watermark(mut self, watermark: Watermark) -> Self {
        self.watermark = watermark;
        self
    }

    /// Run until `cancel` fires. Cancellation is observed at the top of each
    /// cycle and during the inter-cycle sleep, never mid-request.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            watermark = %self.watermark.cursor(),
            "starting polling loop"
        );
        loop {
            if cancel.is_cancelled() {
                break;
            }

            if let Err(e) = self.cycle().await {
                warn!(error = %e, "cycle ended early");
            }

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {},
            }
        }
        info!("polling loop stopped");
    }

    /// One full pass over all channels.
    ///
    /// Returns `Err` only for failures with no local recovery (an
    /// undeliverable reply); everything else is logged and skipped here.
    async fn cycle(&mut self) -> Result<()> {
        let channels = match self.chat.list_channels().await {
            Ok(channels) => channels,
            Err(e) => {
                warn!(error = %e, "failed to list channels, skipping cycle");
                return Ok(());
            },
        };
        debug!(count = channels.len(), "enumerated channels");

        for channel in channels {
            let oldest = self.watermark.cursor();
            let history = match self
                .chat
                .fetch_history(&channel.id, oldest, HISTORY_PAGE_SIZE)
                .await
            {
                Ok(history) => history,
                Err(e) => {
                    warn!(channel = %channel.id, error = %e, "failed to fetch history, skipping channel");
                    continue;
                },
            };

            let mut fresh: Vec<Message> = history
                .into_iter()
                .filter(|m| self.watermark.should_process(m))
                .collect();
            // Oldest first within the channel; stable sort keeps fetch order
            // for equal timestamps.
            fresh.sort_by_key(|m| m.ts);
            debug!(channel = %channel.id, count = fresh.len(), "new messages past watermark");

            for message in fresh {
                self.processor.process(&message).await?;
                self.watermark.advance(message.ts);
            }
        }

        Ok(())
    }
}
