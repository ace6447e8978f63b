//! Rocket.Chat REST client implementing the engine's `ChatGateway`.
//!
//! Authenticates once via `/api/v1/login` and reuses the returned token pair
//! as `X-Auth-Token` / `X-User-Id` headers on every call. Responses carry a
//! `success` envelope flag which maps onto `GatewayError::Api` when false.

mod client;
mod config;
mod error;
mod wire;

pub use {
    client::RocketChatClient,
    config::RocketChatConfig,
    error::{Error, Result},
};
