//! Scenario functions
//!
//! Each operation logs in as the given identity, issues one authenticated
//! request, logs the response and closes the realtime session whatever the
//! outcome.

use async_trait::async_trait;
use harness_common::{Endpoints, HarnessConfig};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::ChatApi;
use crate::dto::{ApiResponse, MessageListPayload, MessagePayload, RoomPayload};
use crate::error::{ClientError, ClientResult};
use crate::request::{AuthedRequest, RequestHelper};
use crate::session::SessionAcquirer;

/// Greeting sent along with every room creation
pub const INITIAL_MESSAGE: &str = "Hi";

/// Live implementation of [`ChatApi`]
#[derive(Debug, Clone)]
pub struct ChatScenarios {
    acquirer: SessionAcquirer,
    requests: RequestHelper,
    endpoints: Endpoints,
    password: String,
}

impl ChatScenarios {
    pub fn new(config: &HarnessConfig) -> ClientResult<Self> {
        let requests = RequestHelper::new(config.timeouts.request)?;
        let acquirer = SessionAcquirer::new(
            config.endpoints.clone(),
            requests.clone(),
            config.timeouts.session,
        );

        Ok(Self {
            acquirer,
            requests,
            endpoints: config.endpoints.clone(),
            password: config.password.clone(),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        email: &str,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> ClientResult<ApiResponse<T>> {
        let session = self.acquirer.acquire(email, &self.password).await?;

        let result = self
            .requests
            .send::<Value>(AuthedRequest {
                token: &session.access_token,
                session: Some(&session.session),
                url: self.endpoints.api(&path),
                method,
                body,
            })
            .await;

        session.close().await;

        match result {
            Ok(response) => {
                info!(operation, email, %response, "Response received");
                serde_json::from_value(response).map_err(ClientError::Decode)
            }
            Err(e) => {
                warn!(operation, email, error = %e, "Scenario failed");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ChatApi for ChatScenarios {
    async fn create_room(
        &self,
        email: &str,
        acceptor_id: Uuid,
    ) -> ClientResult<ApiResponse<RoomPayload>> {
        let body = json!({ "acceptorId": acceptor_id, "initialMessage": INITIAL_MESSAGE });
        self.call(
            "create_room",
            email,
            Method::POST,
            "/api/chat/createRoom".to_string(),
            Some(body),
        )
        .await
    }

    async fn subscribed_rooms(&self, email: &str) -> ClientResult<ApiResponse<Value>> {
        self.call("subscribed_rooms", email, Method::GET, "/api/chat/rooms".to_string(), None)
            .await
    }

    async fn new_rooms(&self, email: &str) -> ClientResult<ApiResponse<Value>> {
        self.call("new_rooms", email, Method::GET, "/api/chat/newRooms".to_string(), None)
            .await
    }

    async fn subscribe(&self, email: &str, room_id: &str) -> ClientResult<ApiResponse<Value>> {
        let path = format!("/api/chat/subscribe/{room_id}");
        self.call("subscribe", email, Method::PATCH, path, None).await
    }

    async fn unsubscribe(&self, email: &str, room_id: &str) -> ClientResult<ApiResponse<Value>> {
        let path = format!("/api/chat/unsubscribe/{room_id}");
        self.call("unsubscribe", email, Method::PATCH, path, None).await
    }

    async fn room(&self, email: &str, room_id: &str) -> ClientResult<ApiResponse<Value>> {
        let path = format!("/api/chat/room/{room_id}");
        self.call("room", email, Method::GET, path, None).await
    }

    async fn send_message(
        &self,
        email: &str,
        room_id: &str,
        content: &str,
    ) -> ClientResult<ApiResponse<MessagePayload>> {
        let path = format!("/api/chat/message/{room_id}");
        let body = json!({ "content": content });
        self.call("send_message", email, Method::POST, path, Some(body))
            .await
    }

    async fn edit_message(
        &self,
        email: &str,
        message_id: &str,
        content: &str,
    ) -> ClientResult<ApiResponse<Value>> {
        let path = format!("/api/chat/message/{message_id}");
        let body = json!({ "content": content });
        self.call("edit_message", email, Method::PATCH, path, Some(body))
            .await
    }

    async fn delete_message(
        &self,
        email: &str,
        message_id: &str,
    ) -> ClientResult<ApiResponse<Value>> {
        let path = format!("/api/chat/message/{message_id}");
        self.call("delete_message", email, Method::DELETE, path, None)
            .await
    }

    async fn messages(
        &self,
        email: &str,
        room_id: &str,
    ) -> ClientResult<ApiResponse<MessageListPayload>> {
        let path = format!("/api/chat/message/{room_id}");
        self.call("messages", email, Method::GET, path, None).await
    }
}
