//! Status classification: every check outcome lands in exactly one of four
//! rollup buckets.

/// The observed outcome of checking one URL.
///
/// A completed response carries its HTTP status, error statuses included.
/// Only a request that never completed (connection error, timeout) is a
/// transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Status(u16),
    TransportFailure,
}

/// The four rollup buckets. Mutually exclusive, total over all outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Success,
    Forbidden,
    NotFound,
    Other,
}

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Bucket; 4] = [
        Bucket::Success,
        Bucket::Forbidden,
        Bucket::NotFound,
        Bucket::Other,
    ];

    /// Stable identifier, matching the summary box names on the analysis page.
    pub fn key(self) -> &'static str {
        match self {
            Self::Success => "success-200",
            Self::Forbidden => "error-403",
            Self::NotFound => "error-404",
            Self::Other => "error-other",
        }
    }

    pub fn label_singular(self) -> &'static str {
        match self {
            Self::Success => "working link",
            Self::Forbidden => "403 error",
            Self::NotFound => "404 error",
            Self::Other => "other error",
        }
    }

    /// Pluralized label: singular for a count of exactly 1, plural otherwise
    /// (including 0).
    pub fn label(self, count: usize) -> String {
        if count == 1 {
            self.label_singular().to_string()
        } else {
            format!("{}s", self.label_singular())
        }
    }
}

/// Classify a check outcome into its bucket.
pub fn classify(outcome: CheckOutcome) -> Bucket {
    match outcome {
        CheckOutcome::Status(200) => Bucket::Success,
        CheckOutcome::Status(403) => Bucket::Forbidden,
        CheckOutcome::Status(404) => Bucket::NotFound,
        _ => Bucket::Other,
    }
}

/// Per-row status text: the literal code for 200/403/404, `N/A` for
/// everything else.
pub fn status_message(outcome: CheckOutcome) -> String {
    match outcome {
        CheckOutcome::Status(code @ (200 | 403 | 404)) => code.to_string(),
        _ => "N/A".to_string(),
    }
}
