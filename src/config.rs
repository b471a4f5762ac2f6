use crate::poller::TickPolicy;
use crate::{JOB_RUN_POLL_INTERVAL_MS, STATUS_PAGE_POLL_INTERVAL_MS};
use reqwest::Url;
use std::time::Duration;

/// Attribute carrying the status-check URL on the host page.
pub const STATUS_URL_ATTRIBUTE: &str = "data-job-status-url";

/// Attribute flagging that the job was already running when the page loaded.
pub const JOB_RUNNING_ATTRIBUTE: &str = "data-job-running";

/// Precondition that must hold before any timer is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartGate {
    /// Poll whenever an endpoint is present.
    Always,
    /// Poll only if the page reported the job as already running.
    JobRunning(bool),
}

impl StartGate {
    pub fn is_open(&self) -> bool {
        match self {
            StartGate::Always => true,
            StartGate::JobRunning(running) => *running,
        }
    }
}

/// Configuration for one polling session, read once when the page loads
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub status_url: Option<String>,
    pub base_url: Option<Url>,
    pub gate: StartGate,
    pub poll_interval: Duration,
    pub tick_policy: TickPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            status_url: None,
            base_url: None,
            gate: StartGate::Always,
            poll_interval: Duration::from_millis(JOB_RUN_POLL_INTERVAL_MS),
            tick_policy: TickPolicy::FixedPeriod,
        }
    }
}

impl SessionConfig {
    /// Job run page: 500ms ticks, only while the job is already running.
    pub fn job_run_page(status_url: Option<String>, job_running: bool) -> Self {
        Self {
            status_url,
            gate: StartGate::JobRunning(job_running),
            poll_interval: Duration::from_millis(JOB_RUN_POLL_INTERVAL_MS),
            ..Default::default()
        }
    }

    /// Status page: 750ms ticks whenever a status URL is present.
    pub fn status_page(status_url: Option<String>) -> Self {
        Self {
            status_url,
            gate: StartGate::Always,
            poll_interval: Duration::from_millis(STATUS_PAGE_POLL_INTERVAL_MS),
            ..Default::default()
        }
    }

    /// Build a config from the host page's embedded `data-*` attributes.
    ///
    /// When the running flag is present the session is gated on it,
    /// otherwise it polls whenever a URL is given.
    pub fn from_attributes<'a, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut status_url = None;
        let mut job_running = None;

        for (name, value) in attributes {
            match name {
                STATUS_URL_ATTRIBUTE => status_url = Some(value.to_string()),
                JOB_RUNNING_ATTRIBUTE => job_running = Some(parse_flag(value)),
                _ => {}
            }
        }

        match job_running {
            Some(running) => Self::job_run_page(status_url, running),
            None => Self::status_page(status_url),
        }
    }

    /// The configured endpoint, or `None` when it is missing or blank.
    pub fn endpoint(&self) -> Option<&str> {
        self.status_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Truthiness of a data attribute: blank, `false`, `0` and `null` are off.
pub fn parse_flag(value: &str) -> bool {
    !matches!(value.trim(), "" | "false" | "0" | "null")
}
