//! Task result payload, wire-compatible with the analysis endpoint's JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::classify::CheckOutcome;
use crate::refs::RefKind;

/// Envelope returned by `GET /result/{task_id}`.
///
/// While the task runs this is `{"successful": false}`; callers keep polling
/// until `successful` flips to true and `value` carries the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub successful: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TaskValue>,
}

/// The payload of a completed task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskValue {
    /// Document metadata, rendered verbatim as key/value pairs.
    pub metadata: Map<String, Value>,
    /// One entry per analyzed reference, in extraction order.
    pub result_data: Vec<ResultItem>,
}

/// One analyzed reference and its check outcome.
///
/// Up to four reference kinds per item; only the first non-empty kind is
/// displayed. `check` holds the HTTP status of the primary reference, and is
/// left empty when the check never completed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(default)]
    pub pdfs: Vec<String>,
    #[serde(default)]
    pub doi: Vec<String>,
    #[serde(default)]
    pub arxiv: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub check: Vec<u16>,
}

impl ResultItem {
    /// First non-empty reference, in fixed priority order: pdfs, doi, arxiv,
    /// urls. `None` when every bucket is empty (no row is rendered).
    pub fn primary(&self) -> Option<(RefKind, &str)> {
        if let Some(url) = self.pdfs.first() {
            return Some((RefKind::Pdf, url));
        }
        if let Some(url) = self.doi.first() {
            return Some((RefKind::Doi, url));
        }
        if let Some(url) = self.arxiv.first() {
            return Some((RefKind::Arxiv, url));
        }
        if let Some(url) = self.urls.first() {
            return Some((RefKind::Url, url));
        }
        None
    }

    /// The recorded check outcome. An empty `check` means the server-side
    /// fetch never completed.
    pub fn outcome(&self) -> CheckOutcome {
        match self.check.first() {
            Some(&code) => CheckOutcome::Status(code),
            None => CheckOutcome::TransportFailure,
        }
    }
}
