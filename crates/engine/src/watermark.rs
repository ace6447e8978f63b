//! Forward-progress cursor over message timestamps.

use chrono::{DateTime, Utc};

use crate::gateway::Message;

/// Monotonic timestamp cursor deciding which fetched messages are new.
///
/// Engine-owned, process-lifetime state: it starts at the engine's start time
/// so only messages arriving after boot are processed, and it never rewinds.
/// A single cursor is shared across all channels; a late-arriving message in
/// one channel can therefore be skipped after a burst in another. Accepted
/// for now. The cursor is self-contained, so a per-channel map stays a local
/// change.
#[derive(Debug, Clone, Copy)]
pub struct Watermark {
    cursor: DateTime<Utc>,
}

impl Watermark {
    /// Start the cursor at `now`; messages at or before boot are never processed.
    #[must_use]
    pub fn now() -> Self {
        Self::starting_at(Utc::now())
    }

    #[must_use]
    pub fn starting_at(cursor: DateTime<Utc>) -> Self {
        Self { cursor }
    }

    /// True iff the message is strictly newer than the cursor.
    #[must_use]
    pub fn should_process(&self, message: &Message) -> bool {
        message.ts > self.cursor
    }

    /// Advance the cursor to `ts`, clamped monotonic: out-of-order calls with
    /// an older timestamp are no-ops.
    pub fn advance(&mut self, ts: DateTime<Utc>) {
        if ts > self.cursor {
            self.cursor = ts;
        }
    }

    #[must_use]
    pub fn cursor(&self) -> DateTime<Utc> {
        self.cursor
    }
}
