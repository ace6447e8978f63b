use thiserror::Error;

/// Errors raised while building or authenticating the client.
///
/// Runtime gateway calls report `membot_engine::GatewayError` instead, so the
/// polling loop sees one error vocabulary regardless of platform.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("login rejected: {message}")]
    Auth { message: String },
}

impl Error {
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
