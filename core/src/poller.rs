//! Bounded-retry polling of long-running remote jobs.
//!
//! `JobPoller::run` drives a status-fetch closure until the job reports
//! `success` or `failed`, or until the retry budget is spent. Fetch errors end
//! the poll session immediately and are returned as `Err`, separate from a
//! job-level failure.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default wait between two status fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default number of non-terminal observations before giving up
pub const DEFAULT_MAX_RETRIES: u32 = 120;

/// Processing state reported by the remote job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessStatus {
    #[default]
    Pending,
    Success,
    Failed,
    /// Any other value the server reports; treated as non-terminal
    Other(String),
}

impl ProcessStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProcessStatus::Pending => "pending",
            ProcessStatus::Success => "success",
            ProcessStatus::Failed => "failed",
            ProcessStatus::Other(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessStatus::Success | ProcessStatus::Failed)
    }
}

impl From<String> for ProcessStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => ProcessStatus::Pending,
            "success" => ProcessStatus::Success,
            "failed" => ProcessStatus::Failed,
            _ => ProcessStatus::Other(value),
        }
    }
}

impl From<ProcessStatus> for String {
    fn from(value: ProcessStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract a status payload must satisfy to be polled
pub trait JobStatus {
    fn process_status(&self) -> &ProcessStatus;

    fn failure_message(&self) -> Option<&str> {
        None
    }

    fn failure_code(&self) -> Option<i64> {
        None
    }

    /// Human-readable reason for a failed job
    fn failure_reason(&self) -> String {
        match (self.failure_message(), self.failure_code()) {
            (Some(message), Some(code)) => format!("{} (error code: {})", message, code),
            (Some(message), None) => message.to_string(),
            (None, Some(code)) => format!("Error code: {}", code),
            (None, None) => "Unknown error".to_string(),
        }
    }
}

/// Terminal result of one poll session
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// Job finished; carries the final payload
    Success(T),
    /// Job reported `failed`
    Failed { reason: String, status: T },
    /// Retry budget spent while the job was still running
    TimedOut { last_status: String },
}

impl<T> PollOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Success(_))
    }
}

/// Retry policy of a poll session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub poll_interval: Duration,
    pub max_retries: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl PollOptions {
    pub fn new(poll_interval: Duration, max_retries: u32) -> Self {
        Self {
            poll_interval,
            max_retries,
        }
    }

    /// Total time spent waiting before a timeout is declared
    pub fn budget(&self) -> Duration {
        self.poll_interval * self.max_retries
    }
}

type ProgressFn<'a> = Box<dyn FnMut(&str, u32) + Send + 'a>;

/// Sequential poll loop with an optional progress observer
pub struct JobPoller<'a> {
    options: PollOptions,
    on_progress: Option<ProgressFn<'a>>,
}

impl<'a> JobPoller<'a> {
    pub fn new(options: PollOptions) -> Self {
        Self {
            options,
            on_progress: None,
        }
    }

    /// Observe every non-terminal status as `(status, retry)` before the wait
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str, u32) + Send + 'a,
    {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn options(&self) -> &PollOptions {
        &self.options
    }

    /// Poll `fetch_status` until the job is terminal or the budget is spent.
    pub async fn run<T, E, F, Fut>(mut self, mut fetch_status: F) -> Result<PollOutcome<T>, E>
    where
        T: JobStatus,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut retries = 0;
        let mut last_status = ProcessStatus::Pending.as_str().to_string();

        while retries < self.options.max_retries {
            let status = match fetch_status().await {
                Ok(status) => status,
                Err(e) => {
                    warn!(target: "poller", error = %e, retry = retries, "Status fetch failed, aborting poll");
                    return Err(e);
                }
            };
            last_status = status.process_status().as_str().to_string();

            if *status.process_status() == ProcessStatus::Success {
                debug!(target: "poller", retries, "Job succeeded");
                return Ok(PollOutcome::Success(status));
            }
            if *status.process_status() == ProcessStatus::Failed {
                let reason = status.failure_reason();
                debug!(target: "poller", retries, reason = %reason, "Job failed");
                return Ok(PollOutcome::Failed { reason, status });
            }

            if let Some(on_progress) = self.on_progress.as_mut() {
                on_progress(&last_status, retries);
            }

            tokio::time::sleep(self.options.poll_interval).await;
            retries += 1;
        }

        debug!(target: "poller", last_status = %last_status, "Retry budget exhausted");
        Ok(PollOutcome::TimedOut { last_status })
    }
}
