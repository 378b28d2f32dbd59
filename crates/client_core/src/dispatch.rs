use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;
use translator::Action;

/// Performs the local effect of an action. Fire-and-forget from the
/// caller's point of view: errors are reported, never retried.
#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    async fn perform_action(&self, action: &Action) -> Result<()>;
}

/// Injects key presses through `xdotool key <name>`.
pub struct XdotoolDispatcher {
    program: String,
}

impl XdotoolDispatcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for XdotoolDispatcher {
    fn default() -> Self {
        Self::new("xdotool")
    }
}

#[async_trait]
impl ActionDispatcher for XdotoolDispatcher {
    async fn perform_action(&self, action: &Action) -> Result<()> {
        let status = Command::new(&self.program)
            .arg("key")
            .arg(action.as_str())
            .status()
            .await
            .with_context(|| format!("failed to launch {}", self.program))?;
        if !status.success() {
            bail!("{} key {action} exited with {status}", self.program);
        }
        Ok(())
    }
}

pub struct DryRunDispatcher;

#[async_trait]
impl ActionDispatcher for DryRunDispatcher {
    async fn perform_action(&self, action: &Action) -> Result<()> {
        info!(%action, "dry run: key not injected");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
