use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use shared::{
    domain::ChannelId,
    error::UpstreamError,
    protocol::{ClientPacket, Handshake, ProgressUpdate, ServerPacket},
};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{error::ProtocolError, Error as WsError, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, warn};
use url::Url;

use crate::error::SessionError;

#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Packet(ServerPacket),
    Undecodable { reason: String },
}

/// The robot's view of an established stream connection.
#[async_trait]
pub trait StreamSession: Send {
    /// `Ok(None)` once the stream has ended.
    async fn next_message(&mut self) -> Result<Option<Incoming>>;
    async fn send_progress(&mut self, update: ProgressUpdate) -> Result<()>;
    async fn close(&mut self) -> Result<()>;
}

pub fn decode_frame(text: &str) -> Incoming {
    match serde_json::from_str::<ServerPacket>(text) {
        Ok(packet) => Incoming::Packet(packet),
        Err(err) => Incoming::Undecodable {
            reason: err.to_string(),
        },
    }
}

pub fn websocket_url(address: &str) -> Result<Url, SessionError> {
    let address = address.trim();
    let rewritten = if let Some(rest) = address.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = address.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if address.starts_with("ws://") || address.starts_with("wss://") {
        address.to_string()
    } else {
        return Err(SessionError::InvalidAddress(address.to_string()));
    };
    Url::parse(&rewritten).map_err(|_| SessionError::InvalidAddress(address.to_string()))
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct WsStreamSession {
    ws: WsStream,
    peer_closed: bool,
    closed: bool,
}

impl WsStreamSession {
    /// Connects to `address` and completes the robot handshake.
    pub async fn connect(address: &str, channel: ChannelId, key: &str) -> Result<Self> {
        let url = websocket_url(address)?;
        let (ws, _) = connect_async(url.as_str())
            .await
            .with_context(|| format!("failed to connect websocket: {url}"))?;
        let mut session = Self {
            ws,
            peer_closed: false,
            closed: false,
        };
        session
            .send_packet(&ClientPacket::Handshake(Handshake {
                channel,
                key: key.to_string(),
            }))
            .await
            .context("failed to send handshake")?;
        session.await_handshake_ack().await?;
        debug!(channel = channel.0, "stream handshake complete");
        Ok(session)
    }

    async fn await_handshake_ack(&mut self) -> Result<()> {
        loop {
            match self.next_message().await? {
                Some(Incoming::Packet(ServerPacket::HandshakeAck)) => return Ok(()),
                Some(Incoming::Packet(ServerPacket::Error(event))) => {
                    let err = SessionError::Upstream(UpstreamError::from(event));
                    return Err(anyhow::Error::new(err).context("handshake rejected"));
                }
                Some(other) => warn!(?other, "ignoring message received before handshake ack"),
                None => bail!(SessionError::HandshakeIncomplete),
            }
        }
    }

    async fn send_packet(&mut self, packet: &ClientPacket) -> Result<()> {
        let text = serde_json::to_string(packet)?;
        self.ws
            .send(Message::Text(text))
            .await
            .context("websocket send failed")
    }
}

#[async_trait]
impl StreamSession for WsStreamSession {
    async fn next_message(&mut self) -> Result<Option<Incoming>> {
        if self.closed || self.peer_closed {
            return Ok(None);
        }
        while let Some(frame) = self.ws.next().await {
            match frame.context("websocket receive failed")? {
                Message::Text(text) => return Ok(Some(decode_frame(&text))),
                Message::Binary(bytes) => {
                    return Ok(Some(Incoming::Undecodable {
                        reason: format!("{} bytes of binary data", bytes.len()),
                    }))
                }
                Message::Close(_) => {
                    self.peer_closed = true;
                    return Ok(None);
                }
                _ => {}
            }
        }
        Ok(None)
    }

    async fn send_progress(&mut self, update: ProgressUpdate) -> Result<()> {
        self.send_packet(&ClientPacket::ProgressUpdate(update)).await
    }

    async fn close(&mut self) -> Result<()> {
        if std::mem::replace(&mut self.closed, true) {
            return Ok(());
        }
        if self.peer_closed {
            // Only the queued close reply is left; the peer may already be gone.
            if let Err(err) = self.ws.flush().await {
                debug!("close reply not delivered: {err}");
            }
            return Ok(());
        }
        match self.ws.close(None).await {
            Ok(())
            | Err(WsError::ConnectionClosed)
            | Err(WsError::AlreadyClosed)
            | Err(WsError::Protocol(ProtocolError::SendAfterClosing)) => Ok(()),
            Err(err) => Err(err).context("failed to close websocket"),
        }
    }
}

#[cfg(test)]
#[path = "tests/connection_tests.rs"]
mod tests;
