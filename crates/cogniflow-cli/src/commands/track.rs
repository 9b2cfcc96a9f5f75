//! The live tracking loop.
//!
//! Runs the core runtime with a session started for the given subject and
//! relays simple line commands from stdin into tracker signals, standing in
//! for the dashboard UI and the browser-extension transport. Events are
//! printed to stdout as JSON lines.

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use cogniflow_core::{
    FocusEngine, Momentum, Signal, TrackerConfig, TrackerRuntime,
};

#[derive(Args)]
pub struct TrackArgs {
    /// Subject to study
    #[arg(long)]
    pub subject: String,
    /// Comma-separated allowed site fragments
    #[arg(long, value_delimiter = ',')]
    pub sites: Vec<String>,
    /// Run without the session store (nothing is synced)
    #[arg(long)]
    pub offline: bool,
}

const HELP: &str = "\
commands: tab <url> | hide | show | touch | yes | no | back |
          break | end-break | stop | status | quit";

pub async fn run(args: TrackArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = TrackerConfig::load()?;

    let client = if args.offline {
        None
    } else {
        Some(super::store_client(&config)?)
    };

    // Seed streak/fatigue from the profile when the store is reachable.
    let momentum = match &client {
        Some(client) => match client.profile().await {
            Ok(profile) => Momentum::with_profile(
                config.momentum,
                profile.focus_streak,
                profile.fatigue_level,
            ),
            Err(err) => {
                log::warn!("could not fetch profile, starting fresh: {err}");
                Momentum::new(config.momentum)
            }
        },
        None => Momentum::new(config.momentum),
    };

    let engine = FocusEngine::with_momentum(config.policy, momentum);
    let (signals_tx, signals_rx) = mpsc::channel(64);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let runtime = TrackerRuntime::new(config, engine, client, signals_rx, events_tx);
    let runtime_handle = tokio::spawn(runtime.run());

    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            if let Ok(json) = serde_json::to_string(&event) {
                println!("{json}");
            }
        }
    });

    signals_tx
        .send(Signal::StartSession {
            subject: args.subject,
            sites: args.sites,
        })
        .await?;
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                signals_tx.send(Signal::Shutdown).await?;
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    signals_tx.send(Signal::Shutdown).await?;
                    break;
                };
                match parse_command(&line) {
                    Some(Signal::Shutdown) => {
                        signals_tx.send(Signal::Shutdown).await?;
                        break;
                    }
                    Some(signal) => signals_tx.send(signal).await?,
                    None => eprintln!("unknown command: {line}\n{HELP}"),
                }
            }
        }
    }

    runtime_handle.await?;
    printer.await?;
    Ok(())
}

/// Map a stdin line to a tracker signal.
fn parse_command(line: &str) -> Option<Signal> {
    let line = line.trim();
    if line.is_empty() {
        return Some(Signal::Activity);
    }
    if let Some(url) = line.strip_prefix("tab ") {
        return Some(Signal::TabInfo {
            url: url.trim().to_string(),
            title: String::new(),
        });
    }
    match line {
        "touch" => Some(Signal::Activity),
        "hide" => Some(Signal::VisibilityHidden),
        "show" => Some(Signal::VisibilityVisible),
        "yes" => Some(Signal::PromptAnswer { still_focused: true }),
        "no" => Some(Signal::PromptAnswer {
            still_focused: false,
        }),
        "back" => Some(Signal::BackToFocus),
        "break" => Some(Signal::StartBreak),
        "end-break" => Some(Signal::EndBreak),
        "stop" => Some(Signal::StopSession),
        "status" => Some(Signal::Snapshot),
        "quit" | "exit" => Some(Signal::Shutdown),
        _ => None,
    }
}
