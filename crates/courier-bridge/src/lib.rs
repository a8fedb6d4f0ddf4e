// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming delivery bridge for Courier.
//!
//! Multiplexes a client's inbound message stream and the router's error
//! replies over one long-lived bidirectional channel. Transports plug in
//! through [`FrameSource`] and [`FrameSink`]; the gateway provides the
//! WebSocket implementation.

pub mod bridge;
pub mod frame;
pub mod session;
pub mod sink;

pub use bridge::StreamBridge;
pub use frame::{decode_frame, FrameError, SystemFrame};
pub use session::{CloseReason, SessionState, StreamSession};
pub use sink::{FrameSink, FrameSource, SerializedSink};
