//! Case catalogue and verdicts

use std::fmt;

/// Every check the runner performs, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Case {
    CreateRoom,
    RecreateRoom,
    RecreateRoomReversed,
    SendBeforeSubscribe,
    NewRoomsBeforeSubscribe,
    Subscribe,
    MemberRoomViews,
    SendAfterSubscribe,
    SendBatch,
    OutsiderSend,
    EditOwnMessage,
    DeleteOwnMessage,
    EditDeletedByNonOwner,
    ListMessages,
    MessageOrder,
    Unsubscribe,
}

impl Case {
    pub const ALL: [Case; 16] = [
        Case::CreateRoom,
        Case::RecreateRoom,
        Case::RecreateRoomReversed,
        Case::SendBeforeSubscribe,
        Case::NewRoomsBeforeSubscribe,
        Case::Subscribe,
        Case::MemberRoomViews,
        Case::SendAfterSubscribe,
        Case::SendBatch,
        Case::OutsiderSend,
        Case::EditOwnMessage,
        Case::DeleteOwnMessage,
        Case::EditDeletedByNonOwner,
        Case::ListMessages,
        Case::MessageOrder,
        Case::Unsubscribe,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateRoom => "create_room",
            Self::RecreateRoom => "recreate_room",
            Self::RecreateRoomReversed => "recreate_room_reversed",
            Self::SendBeforeSubscribe => "send_before_subscribe",
            Self::NewRoomsBeforeSubscribe => "new_rooms_before_subscribe",
            Self::Subscribe => "subscribe",
            Self::MemberRoomViews => "member_room_views",
            Self::SendAfterSubscribe => "send_after_subscribe",
            Self::SendBatch => "send_batch",
            Self::OutsiderSend => "outsider_send",
            Self::EditOwnMessage => "edit_own_message",
            Self::DeleteOwnMessage => "delete_own_message",
            Self::EditDeletedByNonOwner => "edit_deleted_by_non_owner",
            Self::ListMessages => "list_messages",
            Self::MessageOrder => "message_order",
            Self::Unsubscribe => "unsubscribe",
        }
    }

    /// What the service is expected to do
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::CreateRoom => "room creation between owner and peer succeeds",
            Self::RecreateRoom => "recreating the same room is rejected",
            Self::RecreateRoomReversed => "recreating the room in reverse order is rejected",
            Self::SendBeforeSubscribe => "sending before every member subscribed is rejected",
            Self::NewRoomsBeforeSubscribe => "peer can list rooms awaiting subscription",
            Self::Subscribe => "peer subscribes to the room",
            Self::MemberRoomViews => "members can list subscribed rooms and read the room",
            Self::SendAfterSubscribe => "sending after full subscription yields a message id",
            Self::SendBatch => "several further messages each yield an id",
            Self::OutsiderSend => "a non-member sending is rejected",
            Self::EditOwnMessage => "the author edits their own message",
            Self::DeleteOwnMessage => "the author deletes their own message",
            Self::EditDeletedByNonOwner => "a non-owner editing the deleted message is rejected",
            Self::ListMessages => "listing messages returns an array",
            Self::MessageOrder => "listed messages keep their send order",
            Self::Unsubscribe => "peer unsubscribes from the room",
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verdict of a single case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed(String),
    Failed(String),
    /// A prerequisite from an earlier case is missing
    Skipped(String),
}

impl CaseOutcome {
    pub fn passed(detail: impl Into<String>) -> Self {
        Self::Passed(detail.into())
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }

    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed(_))
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed(_) => "passed",
            Self::Failed(_) => "failed",
            Self::Skipped(_) => "skipped",
        }
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Passed(s) | Self::Failed(s) | Self::Skipped(s) => s,
        }
    }
}
