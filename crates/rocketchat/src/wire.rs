//! Serde types for the Rocket.Chat REST API v1.

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

use membot_engine::{Channel, Message};

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<LoginData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LoginData {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "authToken")]
    pub auth_token: String,
}

#[derive(Deserialize)]
pub(crate) struct ChannelsListResponse {
    pub success: bool,
    #[serde(default)]
    pub channels: Vec<WireChannel>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct WireChannel {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl From<WireChannel> for Channel {
    fn from(wire: WireChannel) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct HistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct WireMessage {
    #[serde(rename = "rid")]
    pub room_id: String,
    pub msg: String,
    pub ts: DateTime<Utc>,
    pub u: WireUser,
}

#[derive(Deserialize)]
pub(crate) struct WireUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Self {
            sender_id: wire.u.id,
            sender_username: wire.u.username,
            channel_id: wire.room_id,
            content: wire.msg,
            ts: wire.ts,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct PostMessageRequest<'a> {
    #[serde(rename = "roomId")]
    pub room_id: &'a str,
    pub text: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct PostMessageResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
