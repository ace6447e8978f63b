use std::time::Duration;

use {
    async_trait::async_trait,
    chrono::{DateTime, SecondsFormat, Utc},
    secrecy::{ExposeSecret, Secret},
    serde::de::DeserializeOwned,
    tracing::{debug, info},
};

use membot_engine::{ChatGateway, Channel, GatewayError, Message};

use crate::{
    config::RocketChatConfig,
    error::{Error, Result},
    wire::{ChannelsListResponse, HistoryResponse, LoginRequest, LoginResponse,
           PostMessageRequest, PostMessageResponse, WireChannel, WireMessage},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated Rocket.Chat REST client.
#[derive(Debug)]
pub struct RocketChatClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    user_id: String,
    auth_token: Secret<String>,
}

impl RocketChatClient {
    /// Log in with the configured credentials and keep the session token.
    pub async fn connect(config: RocketChatConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();

        let response: LoginResponse = http
            .post(format!("{base_url}/api/v1/login"))
            .json(&LoginRequest {
                user: &config.username,
                password: config.password.expose_secret(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "success" {
            return Err(Error::auth(
                response.error.unwrap_or_else(|| response.status.clone()),
            ));
        }
        let data = response
            .data
            .ok_or_else(|| Error::auth("login response missing token data"))?;

        info!(username = %config.username, server = %base_url, "authenticated with rocket.chat");

        Ok(Self {
            http,
            base_url,
            username: config.username,
            user_id: data.user_id,
            auth_token: Secret::new(data.auth_token),
        })
    }

    /// Username the bot is logged in as (used for self-message filtering).
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authed(self.http.get(format!("{}{path}", self.base_url)))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.authed(self.http.post(format!("{}{path}", self.base_url)))
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-Auth-Token", self.auth_token.expose_secret())
            .header("X-User-Id", &self.user_id)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        context: &str,
    ) -> std::result::Result<T, GatewayError> {
        let response = builder
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| GatewayError::transport(context, e))?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::malformed(context, e))
    }
}

fn api_failure(error: Option<String>) -> GatewayError {
    GatewayError::api(error.unwrap_or_else(|| "unknown error".into()))
}

#[async_trait]
impl ChatGateway for RocketChatClient {
    async fn list_channels(&self) -> std::result::Result<Vec<Channel>, GatewayError> {
        let response: ChannelsListResponse = self
            .send_json(self.get("/api/v1/channels.list"), "channels.list")
            .await?;
        if !response.success {
            return Err(api_failure(response.error));
        }
        debug!(count = response.channels.len(), "listed channels");
        Ok(response.channels.into_iter().map(WireChannel::into).collect())
    }

    async fn fetch_history(
        &self,
        channel_id: &str,
        oldest: DateTime<Utc>,
        limit: u32,
    ) -> std::result::Result<Vec<Message>, GatewayError> {
        let response: HistoryResponse = self
            .send_json(
                self.get("/api/v1/channels.history").query(&[
                    ("roomId", channel_id),
                    ("oldest", &oldest.to_rfc3339_opts(SecondsFormat::Millis, true)),
                    ("count", &limit.to_string()),
                ]),
                "channels.history",
            )
            .await?;
        if !response.success {
            return Err(api_failure(response.error));
        }
        Ok(response.messages.into_iter().map(WireMessage::into).collect())
    }

    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
    ) -> std::result::Result<(), GatewayError> {
        let response: PostMessageResponse = self
            .send_json(
                self.post("/api/v1/chat.postMessage").json(&PostMessageRequest {
                    room_id: channel_id,
                    text,
                }),
                "chat.postMessage",
            )
            .await?;
        if !response.success {
            return Err(api_failure(response.error));
        }
        Ok(())
    }
}
