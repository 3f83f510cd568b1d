//! Response bodies returned by the chat service
//!
//! Only the fields the harness inspects are typed; everything else the
//! server sends is kept in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};

/// Status marker the service uses for successful calls
pub const STATUS_SUCCESS: &str = "success";

/// Envelope wrapping every chat API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Take the payload, failing if the server sent none
    pub fn into_data(self) -> ClientResult<T> {
        self.data.ok_or(ClientError::MissingField("data"))
    }
}

/// `data` of room creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPayload {
    pub room: Room,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `data` of message send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub message: Message,
}

/// `data` of message listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageListPayload {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<Value>,
}

impl LoginResponse {
    /// The bearer token for subsequent calls
    pub fn token(&self) -> ClientResult<&str> {
        self.access_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(ClientError::MissingField("access_token"))
    }
}
