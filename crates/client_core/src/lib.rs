use anyhow::{Context, Result};
use shared::domain::ChannelId;
use tracing::info;

pub mod api;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod robot;

pub use api::{LobbyClient, LoginResponse, RobotCredentials, DEFAULT_API_URL};
pub use connection::{decode_frame, websocket_url, Incoming, StreamSession, WsStreamSession};
pub use dispatch::{ActionDispatcher, DryRunDispatcher, XdotoolDispatcher};
pub use error::SessionError;
pub use robot::{ExitReason, ReportOutcome, Robot};

/// Logs in, looks up the channel's robot endpoint and opens its stream.
pub async fn join_channel(
    lobby: &LobbyClient,
    username: &str,
    password: &str,
) -> Result<(ChannelId, WsStreamSession)> {
    let login = lobby.login(username, password).await?;
    let channel = login.channel.id;
    info!(channel = channel.0, "logged in");

    let credentials = lobby.robot_credentials(channel).await?;
    let session = WsStreamSession::connect(&credentials.address, channel, &credentials.key)
        .await
        .with_context(|| format!("failed to join stream for channel {channel}"))?;
    info!(channel = channel.0, address = %credentials.address, "stream connected");
    Ok((channel, session))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/support.rs"]
mod support;
