//! The chat operations the runner drives
//!
//! [`ChatScenarios`](crate::ChatScenarios) implements this against the live
//! service; tests substitute in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::dto::{ApiResponse, MessageListPayload, MessagePayload, RoomPayload};
use crate::error::ClientResult;

#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `POST /api/chat/createRoom`
    async fn create_room(&self, email: &str, acceptor_id: Uuid)
        -> ClientResult<ApiResponse<RoomPayload>>;

    /// `GET /api/chat/rooms`: rooms the caller is subscribed to
    async fn subscribed_rooms(&self, email: &str) -> ClientResult<ApiResponse<Value>>;

    /// `GET /api/chat/newRooms`: rooms the caller belongs to but has not subscribed to
    async fn new_rooms(&self, email: &str) -> ClientResult<ApiResponse<Value>>;

    /// `PATCH /api/chat/subscribe/{roomId}`
    async fn subscribe(&self, email: &str, room_id: &str) -> ClientResult<ApiResponse<Value>>;

    /// `PATCH /api/chat/unsubscribe/{roomId}`
    async fn unsubscribe(&self, email: &str, room_id: &str) -> ClientResult<ApiResponse<Value>>;

    /// `GET /api/chat/room/{roomId}`
    async fn room(&self, email: &str, room_id: &str) -> ClientResult<ApiResponse<Value>>;

    /// `POST /api/chat/message/{roomId}`
    async fn send_message(
        &self,
        email: &str,
        room_id: &str,
        content: &str,
    ) -> ClientResult<ApiResponse<MessagePayload>>;

    /// `PATCH /api/chat/message/{messageId}`
    async fn edit_message(
        &self,
        email: &str,
        message_id: &str,
        content: &str,
    ) -> ClientResult<ApiResponse<Value>>;

    /// `DELETE /api/chat/message/{messageId}`
    async fn delete_message(&self, email: &str, message_id: &str)
        -> ClientResult<ApiResponse<Value>>;

    /// `GET /api/chat/message/{roomId}`
    async fn messages(&self, email: &str, room_id: &str)
        -> ClientResult<ApiResponse<MessageListPayload>>;
}
