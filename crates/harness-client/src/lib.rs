//! # harness-client
//!
//! Client side of the chat end-to-end harness: realtime session acquisition,
//! the authenticated request helper and one scenario function per chat
//! operation.

pub mod api;
pub mod dto;
pub mod error;
pub mod request;
pub mod scenarios;
pub mod session;

pub use api::ChatApi;
pub use dto::{
    ApiResponse, LoginResponse, Message, MessageListPayload, MessagePayload, Room, RoomPayload,
};
pub use error::{ClientError, ClientResult};
pub use request::{AuthedRequest, RequestHelper};
pub use reqwest::StatusCode;
pub use scenarios::ChatScenarios;
pub use session::{SessionAcquirer, SessionContext};
