//! Terminal rendering: per-row result lines and the rollup summary board.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::time::Instant;

use linkrot_core::classify::{classify, status_message, Bucket, CheckOutcome};
use linkrot_core::rollup::{quantum_offset_ms, Rollup};

/// One row: colored icon, status message, the link itself.
pub fn row_line(url: &str, outcome: CheckOutcome) -> String {
    let icon = match classify(outcome) {
        Bucket::Success => format!("{}", "✔".green()),
        _ => format!("{}", "✘".red()),
    };
    format!("  {icon} {}  {url}", status_message(outcome).bold())
}

/// Plain text of the four summary boxes with pluralized labels.
pub fn summary_counts(rollup: &Rollup) -> String {
    rollup
        .boxes()
        .iter()
        .map(|(bucket, count)| format!("{count} {}", bucket.label(*count)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Metadata values print verbatim: strings unquoted, everything else as JSON.
pub fn metadata_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Live rollup summary pinned below the row output.
///
/// Counter redraws are deferred to the next quantum boundary so checks that
/// resolve close together produce a single visual update. Cosmetic batching
/// only; the counters themselves update immediately.
pub struct RollupBoard {
    bar: ProgressBar,
    rollup: Rollup,
    quantum: Duration,
    deadline: Option<Instant>,
}

impl RollupBoard {
    pub fn new(quantum: Duration) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{msg}") {
            bar.set_style(style);
        }
        let mut board = Self {
            bar,
            rollup: Rollup::default(),
            quantum,
            deadline: None,
        };
        board.redraw(false);
        board
    }

    /// Print one finished row above the board.
    pub fn print_row(&self, url: &str, outcome: CheckOutcome) {
        self.print(row_line(url, outcome));
    }

    pub fn print_heading(&self, text: &str) {
        self.print(format!("{}", text.bold()));
    }

    fn print(&self, line: String) {
        if self.bar.is_hidden() {
            println!("{line}");
        } else {
            self.bar.println(line);
        }
    }

    /// Record a resolved row. Schedules a redraw at the next quantum boundary
    /// unless one is already pending.
    pub fn record(&mut self, outcome: CheckOutcome) {
        self.rollup.record(classify(outcome));
        if self.deadline.is_none() {
            let now_ms = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            let offset = quantum_offset_ms(now_ms, self.quantum.as_millis() as u64);
            self.deadline = Some(Instant::now() + Duration::from_millis(offset));
        }
    }

    /// The pending redraw deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn rollup(&self) -> Rollup {
        self.rollup
    }

    /// Redraw immediately and clear any scheduled deadline.
    pub fn redraw(&mut self, done: bool) {
        self.deadline = None;
        let heading = if done {
            "Linkrot Summary ✔"
        } else {
            "Linkrot Summary"
        };
        self.bar.set_message(format!(
            "{}  {}",
            heading.bold(),
            summary_counts(&self.rollup)
        ));
    }

    /// Final redraw: flash the completion check mark on the heading, revert
    /// after `flash`, and leave the summary on screen.
    pub async fn finish(mut self, flash: Duration) {
        self.redraw(true);
        tokio::time::sleep(flash).await;
        self.redraw(false);
        self.bar.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;
        for ch in text.chars() {
            match (in_escape, ch) {
                (false, '\u{1b}') => in_escape = true,
                (false, _) => out.push(ch),
                (true, 'm') => in_escape = false,
                (true, _) => {}
            }
        }
        out
    }

    #[test]
    fn summary_counts_pluralizes() {
        let mut rollup = Rollup::default();
        rollup.record(Bucket::Success);
        assert_eq!(
            summary_counts(&rollup),
            "1 working link | 0 403 errors | 0 404 errors | 0 other errors"
        );

        rollup.record(Bucket::Success);
        rollup.record(Bucket::Forbidden);
        assert_eq!(
            summary_counts(&rollup),
            "2 working links | 1 403 error | 0 404 errors | 0 other errors"
        );
    }

    #[test]
    fn row_line_shows_literal_code_or_na() {
        let line = strip_ansi(&row_line("http://x", CheckOutcome::Status(404)));
        assert!(line.contains("404"));
        assert!(line.contains("http://x"));

        let line = strip_ansi(&row_line("http://x", CheckOutcome::Status(500)));
        assert!(line.contains("N/A"));
        assert!(!line.contains("500"));
    }

    #[test]
    fn metadata_values_render_verbatim() {
        assert_eq!(metadata_value(&serde_json::json!("Some Paper")), "Some Paper");
        assert_eq!(metadata_value(&serde_json::json!(12)), "12");
    }

    #[tokio::test]
    async fn record_schedules_one_deadline() {
        let mut board = RollupBoard::new(Duration::from_millis(250));
        assert!(board.deadline().is_none());

        board.record(CheckOutcome::Status(200));
        let first = board.deadline().unwrap();

        board.record(CheckOutcome::Status(404));
        assert_eq!(board.deadline(), Some(first));

        board.redraw(false);
        assert!(board.deadline().is_none());
        assert_eq!(board.rollup().total(), 2);
    }
}
