use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    join_channel, ActionDispatcher, DryRunDispatcher, ExitReason, LobbyClient, Robot,
    StreamSession, XdotoolDispatcher,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use translator::Translator;

mod config;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "crowdplay",
    about = "Plays a keyboard game from aggregated crowd input and reports progress back"
)]
struct Args {
    /// TOML settings file (defaults to ./crowdplay.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    password: Option<String>,
    /// Fraction of the crowd a control must exceed, in (0, 1]
    #[arg(long)]
    threshold: Option<f64>,
    /// Key injector program, invoked as `<injector> key <name>`
    #[arg(long)]
    injector: Option<String>,
    /// Log key presses instead of injecting them
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.api_url {
            settings.api_url = v;
        }
        if let Some(v) = self.username {
            settings.username = Some(v);
        }
        if let Some(v) = self.password {
            settings.password = Some(v);
        }
        if let Some(v) = self.threshold {
            settings.threshold = v;
        }
        if let Some(v) = self.injector {
            settings.injector = v;
        }
        if self.dry_run {
            settings.dry_run = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    args.apply(&mut settings);

    let translator = Translator::new(settings.control_map()?, settings.threshold()?);
    let username = settings
        .username
        .clone()
        .context("missing username: pass --username or set APP__USERNAME")?;
    let password = settings
        .password
        .clone()
        .context("missing password: pass --password or set APP__PASSWORD")?;

    let lobby = LobbyClient::new(settings.api_url.clone())?;
    let (channel, mut session) = join_channel(&lobby, &username, &password).await?;

    let reason = if settings.dry_run {
        play(translator, DryRunDispatcher, &mut session).await?
    } else {
        play(translator, XdotoolDispatcher::new(settings.injector.clone()), &mut session).await?
    };

    match reason {
        ExitReason::Interrupted => {
            println!("Disconnected. All lasers are now off. Have a nice day!")
        }
        ExitReason::StreamEnded => info!(channel = channel.0, "stream ended"),
    }
    Ok(())
}

async fn play<D, S>(translator: Translator, dispatcher: D, session: &mut S) -> Result<ExitReason>
where
    D: ActionDispatcher,
    S: StreamSession,
{
    info!(
        threshold = translator.threshold().value(),
        controls = translator.map().len(),
        "robot ready"
    );
    Robot::new(translator, dispatcher)
        .run(session, shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}
