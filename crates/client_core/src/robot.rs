use std::future::Future;

use anyhow::{Context, Result};
use shared::protocol::{Report, ServerPacket};
use tracing::{error, info, warn};
use translator::Translator;

use crate::{
    connection::{Incoming, StreamSession},
    dispatch::ActionDispatcher,
    error::SessionError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StreamEnded,
    Interrupted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    pub feedback: usize,
    pub actions: usize,
}

/// Drives a stream session: translates each report, sends its progress
/// back upstream and presses the resulting keys.
pub struct Robot<D> {
    translator: Translator,
    dispatcher: D,
}

impl<D: ActionDispatcher> Robot<D> {
    pub fn new(translator: Translator, dispatcher: D) -> Self {
        Self {
            translator,
            dispatcher,
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Runs until the stream ends, `shutdown` resolves or a report hits an
    /// unmapped control. The session is closed exactly once on every path.
    pub async fn run<S, F>(&self, session: &mut S, shutdown: F) -> Result<ExitReason>
    where
        S: StreamSession + ?Sized,
        F: Future<Output = ()>,
    {
        let outcome = tokio::select! {
            result = self.drive(&mut *session) => result,
            () = shutdown => Ok(ExitReason::Interrupted),
        };
        let closed = session.close().await;
        let reason = outcome?;
        closed.context("failed to close stream session")?;
        Ok(reason)
    }

    async fn drive<S>(&self, session: &mut S) -> Result<ExitReason>
    where
        S: StreamSession + ?Sized,
    {
        while let Some(incoming) = session.next_message().await? {
            match incoming {
                Incoming::Packet(ServerPacket::Report(report)) => {
                    self.handle_report(&mut *session, &report).await?;
                }
                Incoming::Packet(ServerPacket::Error(event)) => {
                    error!("{}", SessionError::Upstream(event.into()));
                }
                Incoming::Packet(other) => {
                    warn!("{}", SessionError::UnhandledMessageType(other.kind().to_string()));
                }
                Incoming::Undecodable { reason } => {
                    warn!("{}", SessionError::UnknownMessage(reason));
                }
            }
        }
        Ok(ExitReason::StreamEnded)
    }

    pub async fn handle_report<S>(&self, session: &mut S, report: &Report) -> Result<ReportOutcome>
    where
        S: StreamSession + ?Sized,
    {
        let translation = self.translator.translate(report)?;

        if !translation.feedback.is_empty() {
            session
                .send_progress(translation.progress_update())
                .await
                .context("failed to send progress update")?;
        }

        for action in &translation.actions {
            info!(%action, "PRESSING");
            if let Err(err) = self.dispatcher.perform_action(action).await {
                warn!(%action, "key dispatch failed: {err:#}");
            }
        }

        Ok(ReportOutcome {
            feedback: translation.feedback.len(),
            actions: translation.actions.len(),
        })
    }
}

#[cfg(test)]
#[path = "tests/robot_tests.rs"]
mod tests;
