//! HTTP client for the memory service, implementing the engine's
//! `MemoryGateway` (memorize / retrieve) plus a startup health probe.

mod client;
mod config;

pub use {
    client::{HealthReport, MemoryServiceClient},
    config::MemoryServiceConfig,
};
