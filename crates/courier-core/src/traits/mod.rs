// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Every remote collaborator the router talks to is an `#[async_trait]`
//! object shared as `Arc<dyn Trait + Send + Sync>`, so one client instance
//! serves every channel concurrently.

pub mod directory;
pub mod processor;
pub mod queue;
pub mod store;

pub use directory::{FriendDirectory, GroupDirectory, StatusDirectory};
pub use processor::MessageProcessor;
pub use queue::DeliveryQueue;
pub use store::MessageStore;
