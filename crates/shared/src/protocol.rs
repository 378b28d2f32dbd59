use serde::{Deserialize, Serialize};

use crate::{
    domain::{ChannelId, ControlKind},
    error::ErrorEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TactileSample {
    pub code: u32,
    /// Fraction of participants holding the control down, in `[0, 1]`.
    pub down_mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoystickSample {
    pub axis: u32,
    /// Signed mean deflection, in `[-1, 1]`.
    pub info_mean: f64,
}

/// One aggregated batch of crowd input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub tactile: Vec<TactileSample>,
    #[serde(default)]
    pub joystick: Vec<JoystickSample>,
}

impl Report {
    pub fn sample_count(&self) -> usize {
        self.tactile.len() + self.joystick.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub target: ControlKind,
    pub code: u32,
    pub progress: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub progress: Vec<Progress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handshake {
    pub channel: ChannelId,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientPacket {
    Handshake(Handshake),
    ProgressUpdate(ProgressUpdate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerPacket {
    HandshakeAck,
    Report(Report),
    Error(ErrorEvent),
}

impl ServerPacket {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerPacket::HandshakeAck => "handshake_ack",
            ServerPacket::Report(_) => "report",
            ServerPacket::Error(_) => "error",
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
