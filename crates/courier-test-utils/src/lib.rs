// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Courier integration tests.
//!
//! Mock collaborators record every call so tests can assert on what the
//! router did (and did not) touch, without any external service.
//!
//! # Components
//!
//! - [`MockFriendDirectory`], [`MockGroupDirectory`], [`MockStatusDirectory`]
//! - [`MockStore`] and [`MockQueue`]
//! - [`MockProcessor`] - scripted router stand-in
//! - [`ScriptedSource`] / [`CapturingSink`] - scripted stream transport
//! - [`TestHarness`] - a real router wired to the mocks

pub mod harness;
pub mod mock_directory;
pub mod mock_processor;
pub mod mock_store;
pub mod mock_stream;

pub use harness::{group_message, private_message, TestHarness, TestHarnessBuilder};
pub use mock_directory::{MockFriendDirectory, MockGroupDirectory, MockStatusDirectory};
pub use mock_processor::MockProcessor;
pub use mock_store::{MockQueue, MockStore};
pub use mock_stream::{CapturingSink, ScriptStep, ScriptedSource};
