// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route classification and recipient resolution.
//!
//! Both functions are pure: classifying the same message twice yields the
//! same route, and resolving the same roster twice yields the same targets.

use std::collections::HashSet;

use courier_core::types::{GroupMember, InboundMessage, Route, UserId};
use courier_core::CourierError;

/// Decide the addressing mode of `msg`.
///
/// Rejects a zero sender, a message with no target, and a message that names
/// both a user and a group.
pub fn classify(msg: &InboundMessage) -> Result<Route, CourierError> {
    if msg.from == 0 {
        return Err(CourierError::InvalidSender {
            reason: "sender id must be non-zero".to_string(),
        });
    }

    match (msg.to, msg.group_id) {
        (0, 0) => Err(CourierError::InvalidTarget {
            reason: "message has neither a recipient nor a group".to_string(),
        }),
        (to, group_id) if to != 0 && group_id != 0 => Err(CourierError::InvalidTarget {
            reason: "message must address exactly one of `to` or `group_id`".to_string(),
        }),
        (0, group_id) => Ok(Route::Group { group_id }),
        (to, _) => Ok(Route::Private { to }),
    }
}

/// Recipients of a group fan-out: the roster in directory order, minus the
/// sender, minus zero ids, with repeated entries collapsed onto the first.
pub fn fan_out_targets(sender: UserId, roster: &[GroupMember]) -> Vec<UserId> {
    let mut seen = HashSet::with_capacity(roster.len());
    roster
        .iter()
        .map(|member| member.user_id)
        .filter(|&id| id != 0 && id != sender)
        .filter(|&id| seen.insert(id))
        .collect()
}
