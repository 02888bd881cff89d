use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tokio::sync::mpsc;

mod render;

use linkrot_core::checker::{check_all, CheckEvent};
use linkrot_core::poll::{poll_until_done, HttpTaskSource, PollTick};
use linkrot_core::refs::{sanitize_url, RefKind};
use linkrot_core::Config;
use render::RollupBoard;

/// Linkrot CLI — check reference links and summarize link rot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a list of URLs, one concurrent request per URL
    Check {
        /// URLs to check
        urls: Vec<String>,

        /// Read additional URLs from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,

        /// Per-URL timeout in seconds
        #[arg(long, default_value_t = 20)]
        timeout: u64,
    },
    /// Poll a server task until it completes, then print its results
    Watch {
        /// Task id returned by the server
        task_id: String,

        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        server: String,

        /// Seconds between polls
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    match Args::parse().command {
        Command::Check {
            urls,
            file,
            timeout,
        } => run_check(urls, file, timeout).await,
        Command::Watch {
            task_id,
            server,
            interval,
        } => run_watch(task_id, server, interval).await,
    }
}

/// Eager mode: fire every check at once, print rows as they resolve, keep the
/// rollup board live underneath.
async fn run_check(
    mut urls: Vec<String>,
    file: Option<PathBuf>,
    timeout: u64,
) -> anyhow::Result<()> {
    if let Some(path) = &file {
        let text = std::fs::read_to_string(path)?;
        urls.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(String::from),
        );
    }
    anyhow::ensure!(!urls.is_empty(), "no URLs to check");
    let urls: Vec<String> = urls.iter().map(|url| sanitize_url(url)).collect();

    let config = Config {
        check_timeout: Duration::from_secs(timeout),
        ..Config::default()
    };
    let flash = config.flash_duration;
    let mut board = RollupBoard::new(config.render_quantum);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let checks = tokio::spawn(check_all(urls, config, tx));

    // Rows print in completion order; the board redraws on quantum boundaries.
    loop {
        let deadline = board.deadline();
        tokio::select! {
            maybe_event = rx.recv() => match maybe_event {
                Some(CheckEvent::Started { .. }) => {}
                Some(CheckEvent::Resolved { url, outcome, .. }) => {
                    board.print_row(&url, outcome);
                    board.record(outcome);
                }
                None => break,
            },
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(tokio::time::Instant::now)),
                if deadline.is_some() =>
            {
                board.redraw(false);
            }
        }
    }

    let _ = checks.await?;
    board.finish(flash).await;
    Ok(())
}

/// Polling mode: one outstanding request at a time until the task reports
/// success, then render everything at once.
async fn run_watch(task_id: String, server: String, interval: u64) -> anyhow::Result<()> {
    let source = HttpTaskSource::new(server);

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_message(format!("waiting for task {task_id}"));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut polls = 0u32;
    let value = poll_until_done(
        &source,
        &task_id,
        Duration::from_secs(interval),
        |tick| {
            polls += 1;
            match tick {
                PollTick::Pending => {
                    spinner.set_message(format!("waiting for task {task_id} ({polls} polls)"));
                }
                PollTick::Failed(err) => {
                    spinner.set_message(format!("endpoint unreachable, retrying: {err}"));
                }
            }
        },
    )
    .await?;
    spinner.finish_and_clear();

    for (key, val) in &value.metadata {
        println!("{}: {}", key.bold(), render::metadata_value(val));
    }
    if !value.metadata.is_empty() {
        println!();
    }

    let config = Config::default();
    let mut board = RollupBoard::new(config.render_quantum);
    for kind in [RefKind::Pdf, RefKind::Doi, RefKind::Arxiv, RefKind::Url] {
        let rows: Vec<_> = value
            .result_data
            .iter()
            .filter_map(|item| {
                item.primary()
                    .filter(|(k, _)| *k == kind)
                    .map(|(_, url)| (url.to_string(), item.outcome()))
            })
            .collect();
        if rows.is_empty() {
            continue;
        }
        board.print_heading(kind.section());
        for (url, outcome) in rows {
            board.print_row(&url, outcome);
            board.record(outcome);
        }
    }
    board.finish(config.flash_duration).await;
    Ok(())
}

fn init_logging() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    // Transport failures already show up as rows; keep the facade quiet.
    let _ = TermLogger::init(
        log::LevelFilter::Error,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}
