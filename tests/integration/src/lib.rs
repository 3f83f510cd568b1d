//! Integration test utilities for the chat harness
//!
//! This crate provides an in-process mock of the chat service (REST API plus
//! the realtime WebSocket that issues session identifiers) so the client and
//! runner can be exercised end to end without a live server.


pub use fixtures::*;
pub use helpers::*;
pub use mock_server::{create_mock_app, MockState};
