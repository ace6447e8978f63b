use std::error::Error as StdError;

/// Crate-wide result type for gateway-facing operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Typed failures at the chat/memory gateway boundaries.
///
/// The engine never panics on a gateway failure; every variant maps to one of
/// the recovery paths in the polling loop (skip cycle, skip channel, apology
/// reply, or end the cycle early).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway answered but reported failure (e.g. `success: false`).
    #[error("gateway reported failure: {message}")]
    Api { message: String },

    /// The request never completed (connection, timeout, non-2xx status).
    #[error("gateway transport error: {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The gateway answered 2xx but the payload did not match the expected shape.
    #[error("malformed gateway response: {context}: {source}")]
    Malformed {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl GatewayError {
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn transport(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            context: context.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn malformed(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Malformed {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
