//! Sequential task polling: `pending` until the endpoint reports success.

use std::future::Future;
use std::time::Duration;

use crate::result::{TaskStatus, TaskValue};
use crate::CoreError;

/// Where task status responses come from. Seam between the poll loop and the
/// HTTP layer.
pub trait TaskSource {
    fn fetch(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<TaskStatus, CoreError>> + Send;
}

/// HTTP source against `GET {base}/result/{task_id}`.
pub struct HttpTaskSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

impl TaskSource for HttpTaskSource {
    async fn fetch(&self, task_id: &str) -> Result<TaskStatus, CoreError> {
        let url = format!(
            "{}/result/{}",
            self.base_url,
            urlencoding::encode(task_id)
        );
        let status = self
            .client
            .get(&url)
            .send()
            .await?
            .json::<TaskStatus>()
            .await?;
        Ok(status)
    }
}

/// What happened on one poll tick that did not finish the task.
#[derive(Debug, Clone)]
pub enum PollTick {
    /// Task not yet successful.
    Pending,
    /// Endpoint unreachable or returned garbage; retried like `Pending`.
    Failed(String),
}

/// Poll until the task reports success, then return its value once.
///
/// The first request goes out one `interval` after the call; each later one
/// is scheduled one `interval` after the previous response is observed, so a
/// single request is outstanding at a time. Fetch failures are handled the
/// same as "not yet done", and there is no retry cap: a permanently broken
/// endpoint polls forever. The only terminal error is a protocol violation
/// (`successful: true` without a value).
pub async fn poll_until_done<S: TaskSource>(
    source: &S,
    task_id: &str,
    interval: Duration,
    mut on_tick: impl FnMut(PollTick),
) -> Result<TaskValue, CoreError> {
    loop {
        tokio::time::sleep(interval).await;
        match source.fetch(task_id).await {
            Ok(TaskStatus {
                successful: true,
                value: Some(value),
            }) => return Ok(value),
            Ok(TaskStatus {
                successful: true,
                value: None,
            }) => {
                return Err(CoreError::Payload(
                    "task reported success without a value".into(),
                ));
            }
            Ok(TaskStatus {
                successful: false, ..
            }) => on_tick(PollTick::Pending),
            Err(err) => {
                log::warn!("poll for task {task_id} failed: {err}");
                on_tick(PollTick::Failed(err.to_string()));
            }
        }
    }
}
