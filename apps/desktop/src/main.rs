mod view;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    ControllerConfig, ControllerHandle, HttpWordFetcher, RetryPolicy, RetryingFetcher,
    WordDisplayController, WordSnapshot, DEFAULT_HISTORY_CAPACITY,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

const HELP: &str = "commands: n/new = fetch a new word, p/toggle = pause or resume auto-refresh, q/quit = exit";

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: Url,
    #[arg(long, default_value_t = 10)]
    poll_interval_secs: u64,
    #[arg(long, default_value_t = 3)]
    retries: u32,
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history: usize,
    /// Start with automatic refresh paused.
    #[arg(long)]
    paused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    NewWord,
    TogglePolling,
    Quit,
    Help,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => None,
        "n" | "new" => Some(Input::NewWord),
        "p" | "toggle" => Some(Input::TogglePolling),
        "q" | "quit" => Some(Input::Quit),
        _ => Some(Input::Help),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let fetcher = HttpWordFetcher::new(&args.server_url)
        .with_context(|| format!("invalid server url {}", args.server_url))?;
    info!(endpoint = %fetcher.endpoint(), "using word endpoint");
    let fetcher = RetryingFetcher::new(
        fetcher,
        RetryPolicy::default().with_max_retries(args.retries),
    );

    let handle = WordDisplayController::spawn(
        Arc::new(fetcher),
        ControllerConfig {
            poll_interval: Duration::from_secs(args.poll_interval_secs.max(1)),
            history_capacity: args.history,
            polling_enabled: !args.paused,
            ..ControllerConfig::default()
        },
    );

    let result = run(&handle).await;
    handle
        .shutdown()
        .await
        .context("word display controller did not stop cleanly")?;
    result
}

async fn run(handle: &ControllerHandle) -> Result<()> {
    let mut snapshots = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    draw(&snapshots.borrow_and_update());
    println!("{HELP}");

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!("controller stopped publishing");
                    return Ok(());
                }
                draw(&snapshots.borrow_and_update());
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    return Ok(());
                };
                let sent = match parse_input(&line) {
                    None => Ok(()),
                    Some(Input::NewWord) if !view::refetch_enabled(&handle.snapshot()) => {
                        println!("still loading the first word");
                        Ok(())
                    }
                    Some(Input::NewWord) => handle.refetch_now(),
                    Some(Input::TogglePolling) => handle.toggle_polling(),
                    Some(Input::Quit) => return Ok(()),
                    Some(Input::Help) => {
                        println!("{HELP}");
                        Ok(())
                    }
                };
                if let Err(err) = sent {
                    warn!(error = %err, "command not delivered");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                return Ok(());
            }
        }
    }
}

fn draw(snapshot: &WordSnapshot) {
    println!();
    for line in view::render(snapshot) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_commands() {
        assert_eq!(parse_input("n"), Some(Input::NewWord));
        assert_eq!(parse_input(" NEW "), Some(Input::NewWord));
        assert_eq!(parse_input("p"), Some(Input::TogglePolling));
        assert_eq!(parse_input("toggle"), Some(Input::TogglePolling));
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input("quit"), Some(Input::Quit));
    }

    #[test]
    fn unknown_input_asks_for_help_and_blank_is_ignored() {
        assert_eq!(parse_input("refresh"), Some(Input::Help));
        assert_eq!(parse_input("   "), None);
    }

    #[test]
    fn defaults_match_controller_defaults() {
        let args = Args::parse_from(["desktop"]);
        assert_eq!(args.server_url.as_str(), "http://127.0.0.1:3000/");
        assert_eq!(args.poll_interval_secs, 10);
        assert_eq!(args.retries, 3);
        assert_eq!(args.history, DEFAULT_HISTORY_CAPACITY);
        assert!(!args.paused);
    }
}
