use serde::Deserialize;
use std::fmt;

/// Body returned by the job status endpoint on each poll.
///
/// Only `progress` and `status` drive the monitor. The endpoint serializes
/// the whole job record, so unknown fields are ignored and a couple of
/// descriptive ones are kept for logging.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobStatusResponse {
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub job_uuid: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

impl JobStatusResponse {
    pub fn state(&self) -> Option<JobState> {
        self.status.as_deref().map(JobState::from)
    }

    /// True once the job has reached `FINISHED` or `FAILED`.
    pub fn is_terminal(&self) -> bool {
        self.state().is_some_and(|s| s.is_terminal())
    }
}

/// Job lifecycle label. The set is open-ended; unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Started,
    Finished,
    Failed,
    Other(String),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Finished | JobState::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobState::Queued => "QUEUED",
            JobState::Started => "STARTED",
            JobState::Finished => "FINISHED",
            JobState::Failed => "FAILED",
            JobState::Other(label) => label,
        }
    }
}

impl From<&str> for JobState {
    fn from(label: &str) -> Self {
        match label {
            "QUEUED" => JobState::Queued,
            "STARTED" => JobState::Started,
            "FINISHED" => JobState::Finished,
            "FAILED" => JobState::Failed,
            other => JobState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
