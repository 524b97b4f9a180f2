//! Minimal Telegram Bot API client.
//!
//! Only the three methods the bot actually needs are wrapped: `getMe`
//! for startup validation, `getUpdates` for long polling and
//! `sendMessage` for replies.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use tally_shared::ChatId;

/// Errors surfaced by the Bot API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure: connection, TLS, timeout or decoding.
    #[error("telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `ok: false`.
    #[error("telegram api error: {0}")]
    Api(String),
}

/// An incoming update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic identifier, used to advance the polling offset.
    pub update_id: i64,
    /// Message payload, when the update carries one.
    #[serde(default)]
    pub message: Option<Message>,
}

/// A chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Chat the message was sent in.
    pub chat: Chat,
    /// Text content; absent for stickers, photos and the like.
    #[serde(default)]
    pub text: Option<String>,
}

/// The chat a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Chat identifier, also the ledger's report target.
    pub id: ChatId,
    /// Chat kind: `private`, `group`, `supergroup` or `channel`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Chat {
    /// Whether this is a one-on-one chat with the bot.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.kind == "private"
    }
}

/// The bot's own identity as returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotIdentity {
    /// Bot user id.
    pub id: i64,
    /// Username without the leading `@`.
    #[serde(default)]
    pub username: Option<String>,
}

/// Standard Bot API envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<T>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, ClientError> {
        if self.ok {
            self.result
                .ok_or_else(|| ClientError::Api("response missing result".to_string()))
        } else {
            Err(ClientError::Api(
                self.description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// HTTP client bound to one bot token.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl TelegramClient {
    /// Creates a client for the bot identified by `token`.
    pub fn new(token: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base: format!("https://api.telegram.org/bot{token}"),
        })
    }

    /// Verifies the token and returns the bot's identity.
    pub async fn get_me(&self) -> Result<BotIdentity, ClientError> {
        let response: ApiResponse<BotIdentity> = self
            .http
            .get(format!("{}/getMe", self.base))
            .send()
            .await?
            .json()
            .await?;
        response.into_result()
    }

    /// Long-polls for updates after `offset`.
    ///
    /// The server holds the request open for up to `timeout_secs`, so
    /// the per-request timeout is stretched past it.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u32,
    ) -> Result<Vec<Update>, ClientError> {
        let mut body = serde_json::json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = serde_json::json!(offset);
        }
        let response: ApiResponse<Vec<Update>> = self
            .http
            .post(format!("{}/getUpdates", self.base))
            .timeout(Duration::from_secs(u64::from(timeout_secs) + 10))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        response.into_result()
    }

    /// Sends a plain-text message to `chat`.
    pub async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), ClientError> {
        let body = serde_json::json!({
            "chat_id": chat,
            "text": text,
        });
        let response: ApiResponse<serde_json::Value> = self
            .http
            .post(format!("{}/sendMessage", self.base))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        response.into_result().map(|_| ())
    }
}
