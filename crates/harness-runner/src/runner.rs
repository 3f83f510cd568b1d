//! Ordered test runner
//!
//! Drives a [`ChatApi`] through the room lifecycle as three fixture
//! identities: the room owner, the peer the room is created with, and an
//! outsider who never joins.

use std::future::Future;
use std::time::Instant;

use harness_client::{ApiResponse, ChatApi, ClientError, ClientResult, Message};
use harness_common::{Identities, TestIdentity};
use tracing::{error, info, info_span, Instrument};

use crate::cases::{Case, CaseOutcome};
use crate::report::{CaseResult, RunReport};

/// Messages sent after the first one to check listing order
pub const BATCH_SIZE: usize = 3;

/// Identifiers carried from one case to the next
#[derive(Debug, Default)]
struct RunState {
    room_id: Option<String>,
    first_message_id: Option<String>,
    batch_ids: Vec<String>,
    listed: Option<Vec<Message>>,
}

pub struct TestRunner<'a, A: ChatApi> {
    api: &'a A,
    identities: &'a Identities,
}

impl<'a, A: ChatApi> TestRunner<'a, A> {
    pub fn new(api: &'a A, identities: &'a Identities) -> Self {
        Self { api, identities }
    }

    fn owner(&self) -> &TestIdentity {
        self.identities.owner()
    }

    fn peer(&self) -> &TestIdentity {
        self.identities.peer()
    }

    fn outsider(&self) -> &TestIdentity {
        self.identities.outsider()
    }

    /// Run every case in order and return the report
    pub async fn run(&self) -> RunReport {
        let mut state = RunState::default();
        let mut report = RunReport::start();

        info!(
            owner = %self.owner().email,
            peer = %self.peer().email,
            outsider = %self.outsider().email,
            "Starting test suite"
        );

        report.push(timed(Case::CreateRoom, self.create_room(&mut state)).await);
        report.push(timed(Case::RecreateRoom, self.recreate_room(false)).await);
        report.push(timed(Case::RecreateRoomReversed, self.recreate_room(true)).await);
        report.push(timed(Case::SendBeforeSubscribe, self.send_before_subscribe(&state)).await);
        report.push(timed(Case::NewRoomsBeforeSubscribe, self.new_rooms(&state)).await);
        report.push(timed(Case::Subscribe, self.subscribe(&state)).await);
        report.push(timed(Case::MemberRoomViews, self.member_room_views(&state)).await);
        report.push(timed(Case::SendAfterSubscribe, self.send_after_subscribe(&mut state)).await);
        report.push(timed(Case::SendBatch, self.send_batch(&mut state)).await);
        report.push(timed(Case::OutsiderSend, self.outsider_send(&state)).await);
        report.push(timed(Case::EditOwnMessage, self.edit_own_message(&state)).await);
        report.push(timed(Case::DeleteOwnMessage, self.delete_own_message(&state)).await);
        report.push(timed(Case::EditDeletedByNonOwner, self.edit_deleted(&state)).await);
        report.push(timed(Case::ListMessages, self.list_messages(&mut state)).await);
        report.push(timed(Case::MessageOrder, message_order(&state)).await);
        report.push(timed(Case::Unsubscribe, self.unsubscribe(&state)).await);

        report.finish();
        report.log_summary();
        report
    }

    async fn create_room(&self, state: &mut RunState) -> CaseOutcome {
        info!("Attempting to create a room with owner and peer");
        let response = match self
            .api
            .create_room(&self.owner().email, self.peer().user_id)
            .await
        {
            Ok(response) => response,
            Err(e) => return CaseOutcome::failed(format!("room creation failed: {e}")),
        };

        if !response.is_success() {
            return CaseOutcome::failed(format!("room creation returned status {}", response.status));
        }

        match response.data.map(|d| d.room.id).filter(|id| !id.is_empty()) {
            Some(room_id) => {
                info!(room_id = %room_id, "Room created successfully");
                state.room_id = Some(room_id.clone());
                CaseOutcome::passed(format!("room {room_id}"))
            }
            None => CaseOutcome::failed("room creation returned no room ID"),
        }
    }

    async fn recreate_room(&self, reversed: bool) -> CaseOutcome {
        let (creator, acceptor) = if reversed {
            (self.peer(), self.owner())
        } else {
            (self.owner(), self.peer())
        };

        info!(reversed, "Attempting to recreate the same room");
        expect_rejection(
            self.api.create_room(&creator.email, acceptor.user_id).await,
            "room was recreated; duplicate rooms are not prevented",
        )
    }

    async fn send_before_subscribe(&self, state: &RunState) -> CaseOutcome {
        let Some(room_id) = state.room_id.as_deref() else {
            return CaseOutcome::skipped("no room ID");
        };

        info!("Attempting to send a message without full subscription");
        expect_rejection(
            self.api
                .send_message(&self.owner().email, room_id, "Hello, world!")
                .await,
            "message was accepted before every member subscribed",
        )
    }

    async fn new_rooms(&self, state: &RunState) -> CaseOutcome {
        if state.room_id.is_none() {
            return CaseOutcome::skipped("no room ID");
        }

        expect_success(self.api.new_rooms(&self.peer().email).await, "new rooms listed")
    }

    async fn subscribe(&self, state: &RunState) -> CaseOutcome {
        let Some(room_id) = state.room_id.as_deref() else {
            return CaseOutcome::skipped("no room ID");
        };

        info!(room_id, "Subscribing peer to the room");
        expect_success(
            self.api.subscribe(&self.peer().email, room_id).await,
            "all members subscribed",
        )
    }

    async fn member_room_views(&self, state: &RunState) -> CaseOutcome {
        let Some(room_id) = state.room_id.as_deref() else {
            return CaseOutcome::skipped("no room ID");
        };

        let rooms = expect_success(
            self.api.subscribed_rooms(&self.peer().email).await,
            "subscribed rooms listed",
        );
        if rooms.is_failed() {
            return rooms;
        }

        expect_success(
            self.api.room(&self.owner().email, room_id).await,
            "room detail read",
        )
    }

    async fn send_after_subscribe(&self, state: &mut RunState) -> CaseOutcome {
        let Some(room_id) = state.room_id.clone() else {
            return CaseOutcome::skipped("no room ID");
        };

        info!("Attempting to send a message after full subscription");
        match self.send(&room_id, "Hello from Demir!").await {
            Ok(message_id) => {
                info!(message_id = %message_id, "Message sent successfully");
                state.first_message_id = Some(message_id.clone());
                CaseOutcome::passed(format!("message {message_id}"))
            }
            Err(reason) => CaseOutcome::failed(reason),
        }
    }

    async fn send_batch(&self, state: &mut RunState) -> CaseOutcome {
        let Some(room_id) = state.room_id.clone() else {
            return CaseOutcome::skipped("no room ID");
        };

        info!(count = BATCH_SIZE, "Sending multiple messages to check ordering");
        for i in 0..BATCH_SIZE {
            match self.send(&room_id, &format!("Message {i}")).await {
                Ok(message_id) => state.batch_ids.push(message_id),
                Err(reason) => return CaseOutcome::failed(format!("message {i}: {reason}")),
            }
        }

        CaseOutcome::passed(format!("{} messages sent", state.batch_ids.len()))
    }

    async fn outsider_send(&self, state: &RunState) -> CaseOutcome {
        let Some(room_id) = state.room_id.as_deref() else {
            return CaseOutcome::skipped("no room ID");
        };

        info!("Attempting to send a message by a non-member");
        expect_rejection(
            self.api
                .send_message(&self.outsider().email, room_id, "This should not be possible!")
                .await,
            "non-member was able to send a message",
        )
    }

    async fn edit_own_message(&self, state: &RunState) -> CaseOutcome {
        let Some(message_id) = state.first_message_id.as_deref() else {
            return CaseOutcome::skipped("no message ID");
        };

        info!(message_id, "Editing the sent message");
        expect_success(
            self.api
                .edit_message(&self.owner().email, message_id, "Updated message content")
                .await,
            "message edited",
        )
    }

    async fn delete_own_message(&self, state: &RunState) -> CaseOutcome {
        let Some(message_id) = state.first_message_id.as_deref() else {
            return CaseOutcome::skipped("no message ID");
        };

        info!(message_id, "Deleting the message");
        expect_success(
            self.api.delete_message(&self.owner().email, message_id).await,
            "message deleted",
        )
    }

    async fn edit_deleted(&self, state: &RunState) -> CaseOutcome {
        let Some(message_id) = state.first_message_id.as_deref() else {
            return CaseOutcome::skipped("no message ID");
        };

        info!(message_id, "Attempting to edit a message by a non-owner");
        expect_rejection(
            self.api
                .edit_message(&self.peer().email, message_id, "Illegal edit attempt!")
                .await,
            "non-owner was able to edit the message",
        )
    }

    async fn list_messages(&self, state: &mut RunState) -> CaseOutcome {
        let Some(room_id) = state.room_id.as_deref() else {
            return CaseOutcome::skipped("no room ID");
        };

        info!("Retrieving all messages in the room");
        let messages = match self.api.messages(&self.owner().email, room_id).await {
            Ok(response) => match response.data {
                Some(data) => data.messages,
                None => return CaseOutcome::failed("message listing returned no data"),
            },
            Err(ClientError::Decode(e)) => {
                return CaseOutcome::failed(format!("messages are not an array: {e}"))
            }
            Err(e) => return CaseOutcome::failed(format!("fetching messages failed: {e}")),
        };

        info!(count = messages.len(), "Total messages fetched");
        let detail = format!("{} messages", messages.len());
        state.listed = Some(messages);
        CaseOutcome::passed(detail)
    }

    async fn unsubscribe(&self, state: &RunState) -> CaseOutcome {
        let Some(room_id) = state.room_id.as_deref() else {
            return CaseOutcome::skipped("no room ID");
        };

        expect_success(
            self.api.unsubscribe(&self.peer().email, room_id).await,
            "peer unsubscribed",
        )
    }

    /// Send as the owner and return the new message ID
    async fn send(&self, room_id: &str, content: &str) -> Result<String, String> {
        let response = self
            .api
            .send_message(&self.owner().email, room_id, content)
            .await
            .map_err(|e| format!("sending message failed: {e}"))?;

        response
            .data
            .map(|d| d.message.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "sending message returned no message ID".to_string())
    }
}

/// Batch messages must appear in the listing in the order they were sent
async fn message_order(state: &RunState) -> CaseOutcome {
    let Some(listed) = state.listed.as_ref() else {
        return CaseOutcome::skipped("no message listing");
    };
    if state.batch_ids.len() < BATCH_SIZE {
        return CaseOutcome::skipped("batch was not fully sent");
    }

    let positions: Vec<Option<usize>> = state
        .batch_ids
        .iter()
        .map(|id| listed.iter().position(|m| &m.id == id))
        .collect();

    if let Some(missing) = positions
        .iter()
        .zip(&state.batch_ids)
        .find_map(|(pos, id)| pos.is_none().then_some(id))
    {
        return CaseOutcome::failed(format!("message {missing} missing from listing"));
    }

    if positions.windows(2).all(|w| w[0] < w[1]) {
        CaseOutcome::passed(format!("{BATCH_SIZE} messages in send order"))
    } else {
        CaseOutcome::failed("messages listed out of send order")
    }
}

async fn timed<F>(case: Case, fut: F) -> CaseResult
where
    F: Future<Output = CaseOutcome>,
{
    let span = info_span!("case", case = case.name());
    let started = Instant::now();
    let outcome = fut.instrument(span.clone()).await;
    let elapsed = started.elapsed();

    span.in_scope(|| match &outcome {
        CaseOutcome::Passed(detail) => info!(detail = %detail, "Test passed"),
        CaseOutcome::Failed(reason) => error!(reason = %reason, "Test failed"),
        CaseOutcome::Skipped(reason) => info!(reason = %reason, "Test skipped"),
    });

    CaseResult {
        case,
        outcome,
        elapsed,
    }
}

/// The call must succeed and carry the success status marker
fn expect_success<T>(result: ClientResult<ApiResponse<T>>, detail: &str) -> CaseOutcome {
    match result {
        Ok(response) if response.is_success() => CaseOutcome::passed(detail),
        Ok(response) => CaseOutcome::failed(format!("unexpected status {}", response.status)),
        Err(e) => CaseOutcome::failed(e.to_string()),
    }
}

/// The call must fail; the error itself is the pass signal
fn expect_rejection<T>(result: ClientResult<ApiResponse<T>>, on_success: &str) -> CaseOutcome {
    match result {
        Ok(_) => CaseOutcome::failed(on_success),
        Err(e) => {
            info!(error = %e, status = ?e.status_code(), "Expected error received");
            CaseOutcome::passed(format!("rejected: {e}"))
        }
    }
}
