//! Polling engine that turns chat messages into long-term memories and
//! memory-backed replies.
//!
//! The engine repeatedly enumerates channels, fetches message history past a
//! monotonic watermark, and drives each new message through the processor:
//! memorize the content, retrieve related memories, post a synthesized reply.
//! Gateways are trait seams so the loop can run against any chat platform or
//! memory backend.

pub mod artifact;
pub mod error;
pub mod gateway;
pub mod poller;
pub mod processor;
pub mod watermark;

#[cfg(test)]
pub(crate) mod testing;

pub use {
    error::{GatewayError, Result},
    gateway::{ChatGateway, Channel, MemoryGateway, MemoryItem, MemoryUser, Message,
              RetrievalQuery, RetrievalScope},
    poller::Engine,
    processor::{MessageProcessor, ProcessingOutcome},
    watermark::Watermark,
};
