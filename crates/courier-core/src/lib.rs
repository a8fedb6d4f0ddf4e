// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Courier message router.
//!
//! This crate provides the domain types, the error taxonomy, the explicit
//! request context, and the collaborator traits (directories, message store,
//! delivery queue) that the router and its transports are written against.

pub mod context;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use context::RequestContext;
pub use error::CourierError;
pub use types::{
    DeliveryEnvelope, FanOutResult, GroupId, GroupMember, InboundMessage, MemberRole,
    MessageType, Route, UserId, UserStatus, SYSTEM_SENDER_ID,
};

pub use traits::{
    DeliveryQueue, FriendDirectory, GroupDirectory, MessageProcessor, MessageStore,
    StatusDirectory,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> InboundMessage {
        InboundMessage {
            message_id: "m-1".into(),
            from: 1,
            to: 0,
            group_id: 10,
            content: "hello".into(),
            message_type: MessageType::Image,
            timestamp: 1_700_000_000_000,
            ack_id: "ack-1".into(),
        }
    }

    #[test]
    fn inbound_message_deserializes_minimal_frame() {
        let json = r#"{"message_id": "m-1", "from": 1, "to": 2}"#;
        let msg: InboundMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.from, 1);
        assert_eq!(msg.to, 2);
        assert_eq!(msg.group_id, 0);
        assert_eq!(msg.message_type, MessageType::Text);
        assert!(msg.ack_id.is_empty());
    }

    #[test]
    fn inbound_message_rejects_missing_sender() {
        let json = r#"{"message_id": "m-1", "to": 2}"#;
        assert!(serde_json::from_str::<InboundMessage>(json).is_err());
    }

    #[test]
    fn message_type_uses_lowercase_names() {
        use std::str::FromStr;

        let json = serde_json::to_string(&MessageType::Video).unwrap();
        assert_eq!(json, "\"video\"");
        assert_eq!(MessageType::from_str("audio").unwrap(), MessageType::Audio);
        assert_eq!(MessageType::File.to_string(), "file");
    }

    #[test]
    fn envelope_copies_message_for_target() {
        let msg = sample_message();
        let env = DeliveryEnvelope::for_target(&msg, 3);
        assert_eq!(env.target, 3);
        assert_eq!(env.from, 1);
        assert_eq!(env.group_id, 10);
        assert_eq!(env.message_id, "m-1");
        assert_eq!(env.content, "hello");
        assert_eq!(env.message_type, MessageType::Image);
        assert_eq!(env.ack_id, "ack-1");
    }

    #[test]
    fn denied_result_counts_one_failure() {
        let res = FanOutResult::denied("m-1", "not friends");
        assert!(!res.success);
        assert_eq!(res.success_count, 0);
        assert_eq!(res.failure_count, 1);
        assert!(res.failed_users.is_empty());
        assert_eq!(res.attempted(), 1);
    }

    #[test]
    fn group_member_role_defaults_to_member() {
        let member: GroupMember = serde_json::from_str(r#"{"user_id": 5}"#).unwrap();
        assert_eq!(member, GroupMember::new(5));
        let admin: GroupMember =
            serde_json::from_str(r#"{"user_id": 6, "role": "admin"}"#).unwrap();
        assert_eq!(admin.role, MemberRole::Admin);
    }

    #[test]
    fn route_labels() {
        assert_eq!(Route::Private { to: 2 }.label(), "private");
        assert_eq!(Route::Group { group_id: 10 }.label(), "group");
    }

    #[test]
    fn all_collaborator_traits_are_object_safe() {
        fn _friend(_: &dyn FriendDirectory) {}
        fn _group(_: &dyn GroupDirectory) {}
        fn _status(_: &dyn StatusDirectory) {}
        fn _store(_: &dyn MessageStore) {}
        fn _queue(_: &dyn DeliveryQueue) {}
        fn _processor(_: &dyn MessageProcessor) {}
    }
}
