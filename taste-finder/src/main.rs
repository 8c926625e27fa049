mod terminal;

use anyhow::{Context as _, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use taste_flow::{MockProvider, View, WizardConfig, WizardController};
use terminal::{Command, parse_command, render_text};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Taste Finder: answer four questions, get three dishes.
#[derive(Debug, Parser)]
#[command(name = "taste-finder", version)]
struct Args {
    /// Splash screen duration in milliseconds (overrides TASTE_SPLASH_MS)
    #[arg(long)]
    splash_ms: Option<u64>,

    /// Simulated recommendation latency in milliseconds (overrides TASTE_PROVIDER_LATENCY_MS)
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Give up on the provider after this many milliseconds (overrides TASTE_PROVIDER_TIMEOUT_MS)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Make the first N recommendation requests fail
    #[arg(long, default_value_t = 0)]
    fail_first: u32,

    /// Print each view as a JSON line instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> Result<WizardConfig> {
        let mut config = WizardConfig::from_env().context("Invalid TASTE_* environment")?;
        if let Some(ms) = self.splash_ms {
            config.splash_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.latency_ms {
            config.provider_latency = Duration::from_millis(ms);
        }
        if let Some(ms) = self.timeout_ms {
            config.provider_timeout = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

/// Initialize tracing on stderr so logs stay out of the rendered views
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taste_finder=info,taste_flow=warn".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn show(view: &View, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(view).context("Failed to serialize view")?);
    } else {
        print!("{}", render_text(view));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = args.config()?;

    let provider = Arc::new(MockProvider::from_config(&config).failing_first(args.fail_first));
    let handle = WizardController::spawn(provider, config);
    info!(session_id = %handle.session_id(), ?config, "Starting Taste Finder");

    let mut updates = handle.subscribe();
    let mut view = View::render(&updates.borrow_and_update());
    show(&view, args.json)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                view = View::render(&updates.borrow_and_update());
                show(&view, args.json)?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match parse_command(&line, &view) {
                    Command::Quit => break,
                    Command::Action(action) => {
                        if let Err(e) = handle.dispatch(action).await {
                            warn!(error = %e, "Action rejected");
                        }
                    }
                    Command::Unknown(input) if input.is_empty() => {}
                    Command::Unknown(input) => {
                        println!("  '{input}' is not an option here");
                    }
                }
            }
        }
    }

    handle.shutdown().await.ok();
    info!("Goodbye");
    Ok(())
}
