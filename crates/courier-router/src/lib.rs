// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message routing and fan-out for Courier.
//!
//! This crate provides:
//! - [`classify`] / [`fan_out_targets`]: pure route classification and
//!   recipient resolution
//! - [`FanOutTally`]: per-recipient outcome accounting
//! - [`PersistencePublisher`]: detached, best-effort message persistence
//! - [`TopicResolver`]: delivery topic selection, optionally keyed by edge node
//! - [`Router`]: the orchestrator implementing
//!   [`MessageProcessor`](courier_core::MessageProcessor)

pub mod classifier;
pub mod fanout;
pub mod persist;
pub mod recording;
pub mod router;
pub mod topic;

pub use classifier::{classify, fan_out_targets};
pub use fanout::{tally, FanOutTally};
pub use persist::PersistencePublisher;
pub use router::{Collaborators, Router, NOT_FRIENDS_MESSAGE, NOT_MEMBER_MESSAGE};
pub use topic::TopicResolver;
