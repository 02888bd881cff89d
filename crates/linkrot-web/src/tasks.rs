//! In-memory task store and background task runner.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::{Map, Value};

use linkrot_core::cache::StatusCache;
use linkrot_core::classify::CheckOutcome;
use linkrot_core::refs::{sort_reference, Reference};
use linkrot_core::result::{TaskStatus, TaskValue};
use linkrot_core::status::check_url;

enum TaskEntry {
    Pending,
    Done(TaskValue),
}

/// Concurrent map of task id to task state. Tasks stay pending until their
/// runner stores the finished value. There is no failure state: a runner
/// that cannot check a URL records an empty `check` instead.
#[derive(Default)]
pub struct TaskStore {
    entries: DashMap<String, TaskEntry>,
}

impl TaskStore {
    /// Register a new pending task and return its id.
    pub fn create(&self) -> String {
        let id = new_task_id();
        self.entries.insert(id.clone(), TaskEntry::Pending);
        id
    }

    pub fn complete(&self, id: &str, value: TaskValue) {
        self.entries.insert(id.to_string(), TaskEntry::Done(value));
    }

    /// Status envelope for the result endpoint; `None` for unknown ids.
    pub fn status(&self, id: &str) -> Option<TaskStatus> {
        self.entries.get(id).map(|entry| match entry.value() {
            TaskEntry::Pending => TaskStatus {
                successful: false,
                value: None,
            },
            TaskEntry::Done(value) => TaskStatus {
                successful: true,
                value: Some(value.clone()),
            },
        })
    }
}

fn new_task_id() -> String {
    format!("{:016x}", fastrand::u64(..))
}

/// Run one analysis task to completion.
///
/// Sorts each reference into a result item, checks the primary URL of every
/// item concurrently, and stores the finished payload. A check that never
/// completes leaves `check` empty, which clients classify as `other`.
pub async fn run_task(
    store: Arc<TaskStore>,
    client: reqwest::Client,
    cache: Arc<StatusCache>,
    id: String,
    metadata: Map<String, Value>,
    references: Vec<Reference>,
    timeout: Duration,
) {
    let mut handles = Vec::with_capacity(references.len());
    for reference in &references {
        let mut item = sort_reference(reference);
        let client = client.clone();
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let primary = item.primary().map(|(_, url)| url.to_string());
            if let Some(url) = primary {
                let outcome = match cache.get(&url) {
                    Some(outcome) => outcome,
                    None => {
                        let outcome = check_url(&client, &url, timeout).await;
                        cache.insert(&url, outcome);
                        outcome
                    }
                };
                if let CheckOutcome::Status(code) = outcome {
                    item.check.push(code);
                }
            }
            item
        }));
    }

    let mut result_data = Vec::with_capacity(handles.len());
    for handle in handles {
        if let Ok(item) = handle.await {
            result_data.push(item);
        }
    }

    log::info!("task {id} complete: {} items", result_data.len());
    store.complete(
        &id,
        TaskValue {
            metadata,
            result_data,
        },
    );
}

#[cfg(test)]
mod tests {
    use linkrot_core::refs::RefKind;

    use super::*;

    #[test]
    fn unknown_task_has_no_status() {
        let store = TaskStore::default();
        assert!(store.status("nope").is_none());
    }

    #[test]
    fn created_task_is_pending() {
        let store = TaskStore::default();
        let id = store.create();
        let status = store.status(&id).unwrap();
        assert!(!status.successful);
        assert!(status.value.is_none());
    }

    #[test]
    fn completed_task_carries_value() {
        let store = TaskStore::default();
        let id = store.create();
        store.complete(
            &id,
            TaskValue {
                metadata: Map::new(),
                result_data: Vec::new(),
            },
        );
        let status = store.status(&id).unwrap();
        assert!(status.successful);
        assert!(status.value.is_some());
    }

    #[test]
    fn task_ids_are_distinct() {
        let store = TaskStore::default();
        let a = store.create();
        let b = store.create();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn run_task_records_unreachable_check_as_empty() {
        let store = Arc::new(TaskStore::default());
        let cache = Arc::new(StatusCache::default());
        let id = store.create();

        // Unparseable host fails before any network I/O
        let references = vec![Reference {
            kind: RefKind::Url,
            raw: "http://[bad-host".into(),
        }];
        run_task(
            store.clone(),
            reqwest::Client::new(),
            cache,
            id.clone(),
            Map::new(),
            references,
            Duration::from_secs(1),
        )
        .await;

        let status = store.status(&id).unwrap();
        assert!(status.successful);
        let value = status.value.unwrap();
        assert_eq!(value.result_data.len(), 1);
        assert!(value.result_data[0].check.is_empty());
    }
}
