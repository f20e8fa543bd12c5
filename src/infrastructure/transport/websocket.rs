//! WebSocket Connection Adapter
//!
//! Wraps an upgraded axum WebSocket. Text frames are relayed as-is; binary
//! frames are accepted when they hold UTF-8 text. Ping/pong is answered by
//! axum and never surfaces as a payload.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};

use crate::domain::{Connection, FrameReader, FrameWriter, Payload};
use crate::shared::error::ConnectionError;

/// An accepted WebSocket connection.
pub struct WebSocketConnection {
    socket: WebSocket,
}

impl WebSocketConnection {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl Connection for WebSocketConnection {
    type Reader = WebSocketReader;
    type Writer = WebSocketWriter;

    fn split(self) -> (Self::Reader, Self::Writer) {
        let (sink, stream) = self.socket.split();
        (
            WebSocketReader { stream },
            WebSocketWriter { sink, closed: false },
        )
    }
}

pub struct WebSocketReader {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl FrameReader for WebSocketReader {
    async fn receive(&mut self) -> Result<Payload, ConnectionError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Payload::from(text.as_str())),
                Some(Ok(Message::Binary(bytes))) => {
                    return String::from_utf8(bytes.to_vec())
                        .map(Payload::from)
                        .map_err(|_| ConnectionError::Protocol("binary frame is not UTF-8".into()));
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) | None => return Err(ConnectionError::Closed),
                Some(Err(e)) => return Err(ConnectionError::Transport(e)),
            }
        }
    }
}

pub struct WebSocketWriter {
    sink: SplitSink<WebSocket, Message>,
    closed: bool,
}

#[async_trait]
impl FrameWriter for WebSocketWriter {
    async fn send(&mut self, payload: Payload) -> Result<(), ConnectionError> {
        if self.closed {
            return Err(ConnectionError::Closed);
        }
        self.sink
            .send(Message::Text(payload.as_str().into()))
            .await
            .map_err(ConnectionError::Transport)
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        // The peer may already be gone; a failed close is still a close.
        let _ = self.sink.send(Message::Close(None)).await;
        let _ = self.sink.close().await;
    }
}
