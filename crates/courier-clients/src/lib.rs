// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator clients for Courier.
//!
//! JSON-over-HTTP implementations of the directory, store, and queue traits
//! from `courier-core`, plus [`InMemoryQueue`] for single-process setups.
//! The HTTP clients are cheap to clone and safe to share across streams.

mod http;

pub mod broker;
pub mod directory;
pub mod memory;
pub mod store;

pub use broker::HttpDeliveryQueue;
pub use directory::{HttpFriendDirectory, HttpGroupDirectory, HttpStatusDirectory};
pub use memory::InMemoryQueue;
pub use store::HttpMessageStore;
