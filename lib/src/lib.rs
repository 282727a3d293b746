//! Telegram Bot API bindings for Rust
//! Provides blocking calls to identify the bot, poll updates and send messages

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Extra time on top of the long-poll timeout before the HTTP client gives up
const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),
    #[error("Telegram API error ({code:?}): {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
    #[error("Bot token is empty")]
    InvalidToken,
}

// Request URLs embed the bot token, so they never make it into the error.
impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::RequestError(err.without_url())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
}

impl Message {
    /// A message is a command when it starts with a `bot_command` entity
    pub fn is_command(&self) -> bool {
        self.entities
            .iter()
            .any(|e| e.kind == "bot_command" && e.offset == 0)
    }

    /// Command name without the leading slash and `@botname` suffix
    pub fn command(&self) -> Option<&str> {
        if !self.is_command() {
            return None;
        }

        let text = self.text.as_deref()?;
        let word = text.split_whitespace().next()?;
        let word = word.strip_prefix('/')?;
        Some(word.split('@').next().unwrap_or(word))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, TelegramError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api {
                code: self.error_code,
                description: self
                    .description
                    .unwrap_or_else(|| "missing result".to_string()),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct GetUpdatesPayload {
    offset: i64,
    timeout: u64,
    allowed_updates: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: i64,
    text: &'a str,
}

pub struct TelegramClient {
    url: String,
    client: Client,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self, TelegramError> {
        if token.trim().is_empty() {
            return Err(TelegramError::InvalidToken);
        }

        let client = Client::builder().timeout(poll_timeout + POLL_GRACE).build()?;

        Ok(Self {
            url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            client,
        })
    }

    fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &P,
    ) -> Result<T, TelegramError> {
        // Telegram reports API failures with a JSON body and a non-2xx status,
        // so the body is decoded before looking at the status.
        let response = self
            .client
            .post(format!("{}/{}", self.url, method))
            .json(payload)
            .send()?;

        let wrapper: ApiResponse<T> = response.json()?;
        wrapper.into_result()
    }

    /// Fetch the bot's own account
    pub fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({}))
    }

    /// Drop any configured webhook so long polling is allowed
    pub fn delete_webhook(&self) -> Result<bool, TelegramError> {
        self.call("deleteWebhook", &serde_json::json!({}))
    }

    /// Long-poll for updates starting at `offset`
    pub fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>, TelegramError> {
        let payload = GetUpdatesPayload {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: vec!["message"],
        };

        self.call("getUpdates", &payload)
    }

    /// Send a plain text message to a chat
    pub fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        self.call("sendMessage", &SendMessagePayload { chat_id, text })
    }
}
