//! # parsetrack-cli
//!
//! Terminal harness for the progress subscription client: subscribe to a
//! parsing task and stream its progress until completion.

#![deny(unsafe_code)]

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use parsetrack_client::{ChannelSink, ClientConfig, ProgressEvent, ProgressSubscriber};
use parsetrack_core::TaskId;
use parsetrack_settings::{ClientSettings, load_settings};

/// Watch resume-parsing progress from the terminal.
#[derive(Parser, Debug)]
#[command(name = "parsetrack", about = "Watch resume-parsing progress from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Subscribe to a parsing task and stream progress until it finishes.
    Watch {
        /// Task identifier returned by the upload endpoint.
        #[arg(long)]
        task_id: String,

        /// Access token attached to the connection URL.
        #[arg(long)]
        token: String,

        /// Override the configured base API URL.
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Print the effective settings as JSON.
    Settings,
}

fn init_tracing(settings: &ClientSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.filter.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_settings().context("failed to load settings")?;
    init_tracing(&settings);

    let cli = Cli::parse();
    match cli.command {
        Command::Watch {
            task_id,
            token,
            api_url,
        } => watch(&settings, task_id, &token, api_url).await,
        Command::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

/// Subscribe and print one line per event until the task terminates.
async fn watch(
    settings: &ClientSettings,
    task_id: String,
    token: &str,
    api_url: Option<String>,
) -> Result<()> {
    let base_url = api_url.unwrap_or_else(|| settings.api.base_url.clone());
    debug!(base_url, task_id, "starting watch");

    let subscriber = ProgressSubscriber::new(ClientConfig {
        base_url,
        reconnect: settings.reconnect,
    });
    let (sink, mut events) = ChannelSink::new();
    subscriber
        .subscribe(TaskId::from(task_id), token, sink)
        .await
        .context("failed to start subscription")?;

    while let Some(event) = events.recv().await {
        let now = chrono::Local::now().format("%H:%M:%S");
        match event {
            ProgressEvent::Progress(update) => {
                let detail = update
                    .message
                    .map(|m| format!(" ({m})"))
                    .unwrap_or_default();
                println!(
                    "[{now}] {:>3}% {}: {}{detail}",
                    update.progress, update.stage, update.stage_label
                );
            }
            ProgressEvent::Completed(resume_id) => {
                println!("[{now}] completed: resume {resume_id}");
                return Ok(());
            }
            ProgressEvent::Error(message) => {
                subscriber.disconnect().await;
                bail!("parsing failed: {message}");
            }
        }
    }

    bail!("progress channel ended without a result")
}
