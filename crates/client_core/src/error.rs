use shared::error::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("received a message that could not be decoded: {0}")]
    UnknownMessage(String),
    #[error("received `{0}` packet but no handler is registered for it")]
    UnhandledMessageType(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("invalid stream address `{0}`: expected ws://, wss://, http:// or https://")]
    InvalidAddress(String),
    #[error("stream closed before the handshake was acknowledged")]
    HandshakeIncomplete,
}
