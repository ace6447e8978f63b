use {
    secrecy::Secret,
    url::Url,
};

use crate::error::Result;

/// Connection settings for one bot account.
#[derive(Clone)]
pub struct RocketChatConfig {
    /// Server base URL, e.g. `https://chat.example.com`.
    pub base_url: Url,
    /// Bot username; also used for self-message filtering.
    pub username: String,
    pub password: Secret<String>,
}

impl RocketChatConfig {
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: Secret<String>,
    ) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            username: username.into(),
            password,
        })
    }
}

impl std::fmt::Debug for RocketChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocketChatConfig")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
