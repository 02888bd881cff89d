//! Eager batch checker: one concurrently spawned request per URL.
//!
//! There is deliberately no concurrency limit, ordering guarantee, or
//! backpressure. Events arrive in completion order; the rollup tolerates that
//! because it only accumulates independent counters.

use tokio::sync::mpsc;

use crate::classify::{CheckOutcome, classify};
use crate::rollup::Rollup;
use crate::status::check_url;
use crate::Config;

/// Outcome of one row's check.
#[derive(Debug, Clone)]
pub struct RowResult {
    /// Position in the input list; row identity.
    pub index: usize,
    pub url: String,
    pub outcome: CheckOutcome,
}

/// Progress events emitted while checks are in flight. `Resolved` events may
/// arrive in any order.
#[derive(Debug, Clone)]
pub enum CheckEvent {
    Started {
        index: usize,
        total: usize,
        url: String,
    },
    Resolved {
        index: usize,
        total: usize,
        url: String,
        outcome: CheckOutcome,
    },
}

/// Check every URL concurrently and collect the results.
///
/// One task is spawned per URL, all fired immediately. Events are sent on
/// `events` as checks start and resolve; the channel closes when the last
/// check finishes. Returns the rows in input order plus the accumulated
/// rollup.
pub async fn check_all(
    urls: Vec<String>,
    config: Config,
    events: mpsc::UnboundedSender<CheckEvent>,
) -> (Vec<RowResult>, Rollup) {
    let client = reqwest::Client::new();
    let total = urls.len();
    let timeout = config.check_timeout;

    let mut handles = Vec::with_capacity(total);
    for (index, url) in urls.into_iter().enumerate() {
        let client = client.clone();
        let events = events.clone();
        handles.push(tokio::spawn(async move {
            let _ = events.send(CheckEvent::Started {
                index,
                total,
                url: url.clone(),
            });
            let outcome = check_url(&client, &url, timeout).await;
            let _ = events.send(CheckEvent::Resolved {
                index,
                total,
                url: url.clone(),
                outcome,
            });
            RowResult {
                index,
                url,
                outcome,
            }
        }));
    }
    drop(events);

    let mut rows = Vec::with_capacity(total);
    for handle in handles {
        if let Ok(row) = handle.await {
            rows.push(row);
        }
    }
    rows.sort_by_key(|row| row.index);

    let rollup = accumulate(rows.iter().map(|row| row.outcome));
    (rows, rollup)
}

/// Fold a sequence of outcomes into rollup counters.
pub fn accumulate(outcomes: impl IntoIterator<Item = CheckOutcome>) -> Rollup {
    let mut rollup = Rollup::default();
    for outcome in outcomes {
        rollup.record(classify(outcome));
    }
    rollup
}
