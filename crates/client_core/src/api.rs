use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::domain::{ChannelId, UserId};

pub const DEFAULT_API_URL: &str = "https://beam.pro/api/v1";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChannelRef {
    pub id: ChannelId,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
    pub channel: ChannelRef,
}

/// Where and how the robot joins a channel's input stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RobotCredentials {
    pub address: String,
    pub key: String,
}

/// HTTP client for the lobby API that hands out stream credentials.
pub struct LobbyClient {
    http: Client,
    api_url: String,
}

impl LobbyClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let api_url = api_url.into();
        url::Url::parse(&api_url).with_context(|| format!("invalid api url: {api_url}"))?;
        Ok(Self {
            http: Client::builder()
                .cookie_store(true)
                .build()
                .context("failed to build http client")?,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let res = self
            .http
            .post(format!("{}/users/login", self.api_url))
            .form(&LoginRequest { username, password })
            .send()
            .await
            .context("login request failed")?
            .error_for_status()
            .context("login rejected")?;
        res.json().await.context("invalid login response")
    }

    pub async fn robot_credentials(&self, channel: ChannelId) -> Result<RobotCredentials> {
        let res = self
            .http
            .get(format!("{}/tetris/{}/robot", self.api_url, channel))
            .send()
            .await
            .with_context(|| format!("robot lookup failed for channel {channel}"))?
            .error_for_status()
            .with_context(|| format!("robot lookup rejected for channel {channel}"))?;
        res.json().await.context("invalid robot response")
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
