// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket transport for the streaming bridge.
//!
//! Client -> Server: one JSON `InboundMessage` per text frame.
//! ```json
//! {"message_id": "m-1", "from": 7, "group_id": 10, "content": "hi"}
//! ```
//!
//! Server -> Client: a system frame when a message could not be routed.
//! ```json
//! {"message_id": "m-1", "from": 0, "to": 7, "content": "...", "timestamp": 1700000000000}
//! ```

use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::Response,
};
use courier_bridge::{
    FrameError, FrameSink, FrameSource, SerializedSink, StreamSession, SystemFrame, decode_frame,
};
use courier_core::types::InboundMessage;
use futures::stream::SplitStream;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::server::GatewayState;

/// Outbound frames buffered per socket before writes apply backpressure.
const OUTBOUND_BUFFER: usize = 64;

/// Describe the stream metrics. Called once after the recorder is installed.
pub fn register_metrics() {
    metrics::describe_gauge!("courier_active_streams", "Open WebSocket streams");
    metrics::describe_counter!(
        "courier_streams_closed_total",
        "Closed WebSocket streams, by close reason"
    );
}

/// How long a closing socket gets to flush queued frames.
const WRITER_DRAIN: Duration = Duration::from_secs(2);

/// WebSocket upgrade handler. Authentication already ran as middleware.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<GatewayState>,
) -> Response {
    let peer = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

/// Run one socket through the bridge.
///
/// A writer task owns the sending half and drains an mpsc channel; the bridge
/// only ever sees the channel.
async fn handle_socket(socket: WebSocket, state: GatewayState, peer: String) {
    let (mut ws_sender, ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);

    let mut writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                return;
            }
        }
        let _ = ws_sender.close().await;
    });

    let session = StreamSession::new(peer);
    state.health.active_streams.fetch_add(1, Ordering::Relaxed);
    metrics::gauge!("courier_active_streams").increment(1.0);

    let reason = state
        .bridge
        .serve(
            session,
            WsFrameSource {
                receiver: ws_receiver,
            },
            SerializedSink::new(WsFrameSink { tx }),
            state.shutdown.child_token(),
        )
        .await;

    state.health.active_streams.fetch_sub(1, Ordering::Relaxed);
    metrics::gauge!("courier_active_streams").decrement(1.0);
    metrics::counter!("courier_streams_closed_total", "reason" => reason.to_string()).increment(1);

    if tokio::time::timeout(WRITER_DRAIN, &mut writer).await.is_err() {
        writer.abort();
    }
}

/// Reads and decodes text frames from the socket.
struct WsFrameSource {
    receiver: SplitStream<WebSocket>,
}

#[async_trait]
impl FrameSource for WsFrameSource {
    async fn next_frame(&mut self) -> Option<Result<InboundMessage, FrameError>> {
        loop {
            let msg = match self.receiver.next().await? {
                Ok(msg) => msg,
                Err(e) => return Some(Err(FrameError::Transport(e.to_string()))),
            };
            match msg {
                Message::Text(text) => return Some(decode_frame(text.as_str())),
                Message::Binary(_) => {
                    return Some(Err(FrameError::Malformed(
                        "binary frames are not supported".to_string(),
                    )));
                }
                Message::Close(_) => return None,
                // Ping/pong are answered by the protocol layer.
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    }
}

/// Queues encoded frames for the writer task.
struct WsFrameSink {
    tx: mpsc::Sender<String>,
}

#[async_trait]
impl FrameSink for WsFrameSink {
    async fn send_frame(&mut self, frame: &SystemFrame) -> Result<(), FrameError> {
        let text = frame.to_json()?;
        self.tx
            .send(text)
            .await
            .map_err(|_| FrameError::Transport("socket writer closed".to_string()))
    }
}
