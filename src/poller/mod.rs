use crate::client::types::{JobState, JobStatusResponse};
use crate::client::{StatusClient, StatusSource};
use crate::config::SessionConfig;
use crate::error::MonitorError;
use crate::presenter::{ProgressIndicator, ProgressPresenter};
use crate::termination::{Outcome, PageReloader, TerminationHandler};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How ticks relate to in-flight requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Wall-clock fixed period. A response slower than the period overlaps
    /// the next tick's request.
    #[default]
    FixedPeriod,
    /// The next tick is scheduled one period after the previous response
    /// was handled, so at most one request is in flight.
    Serialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Stopped,
}

/// Owns one polling session: the repeating timer, the presenter and the
/// termination path. Create one per page view.
///
/// Starting requires a running tokio runtime.
pub struct PollingController {
    presenter: Arc<ProgressPresenter>,
    termination: Arc<TerminationHandler>,
    timer: CancellationToken,
    started: AtomicBool,
}

impl PollingController {
    pub fn new(indicator: Arc<dyn ProgressIndicator>, reloader: Arc<dyn PageReloader>) -> Self {
        let timer = CancellationToken::new();
        Self {
            presenter: Arc::new(ProgressPresenter::new(indicator)),
            termination: Arc::new(TerminationHandler::new(timer.clone(), reloader)),
            timer,
            started: AtomicBool::new(false),
        }
    }

    /// Start polling the configured endpoint.
    ///
    /// Returns `Ok(false)` without creating a timer when the start gate is
    /// closed or no endpoint is configured.
    pub fn start(&self, config: &SessionConfig) -> Result<bool, MonitorError> {
        self.ensure_idle()?;

        if !config.gate.is_open() {
            debug!("job not running, status polling disabled");
            return Ok(false);
        }

        let Some(endpoint) = config.endpoint() else {
            debug!("no status endpoint, status polling disabled");
            return Ok(false);
        };

        let client = StatusClient::from_endpoint(endpoint, config.base_url.as_ref())?;
        self.start_with_source(Arc::new(client), config.poll_interval, config.tick_policy)
    }

    /// Start polling an arbitrary status source. Gates are not consulted.
    pub fn start_with_source(
        &self,
        source: Arc<dyn StatusSource>,
        period: Duration,
        policy: TickPolicy,
    ) -> Result<bool, MonitorError> {
        if period.is_zero() {
            return Err(MonitorError::InvalidInterval);
        }
        self.ensure_idle()?;
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(MonitorError::AlreadyStarted);
        }

        let tick = Arc::new(TickContext {
            source,
            presenter: self.presenter.clone(),
            termination: self.termination.clone(),
            timer: self.timer.clone(),
            completion: Mutex::new(()),
        });

        info!(?period, ?policy, "status polling started");
        tokio::spawn(Self::poll_loop(tick, period, policy));
        Ok(true)
    }

    /// Cancel the repeating timer. Idempotent; does not reload.
    pub fn stop(&self) {
        if !self.timer.is_cancelled() {
            info!("status polling stopped");
        }
        self.timer.cancel();
    }

    pub fn state(&self) -> PollState {
        if self.timer.is_cancelled() {
            PollState::Stopped
        } else if self.started.load(Ordering::Acquire) {
            PollState::Polling
        } else {
            PollState::Idle
        }
    }

    /// Resolves once the session is Stopped. Never resolves for a session
    /// that is neither started nor stopped.
    pub async fn stopped(&self) {
        self.timer.cancelled().await
    }

    /// True if the session ended through the reload path.
    pub fn reloaded(&self) -> bool {
        self.termination.has_fired()
    }

    fn ensure_idle(&self) -> Result<(), MonitorError> {
        if self.timer.is_cancelled() {
            return Err(MonitorError::SessionStopped);
        }
        if self.started.load(Ordering::Acquire) {
            return Err(MonitorError::AlreadyStarted);
        }
        Ok(())
    }

    async fn poll_loop(tick: Arc<TickContext>, period: Duration, policy: TickPolicy) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = tick.timer.cancelled() => break,
                _ = ticker.tick() => match policy {
                    TickPolicy::FixedPeriod => {
                        tokio::spawn(tick.clone().run());
                    }
                    TickPolicy::Serialized => {
                        tick.clone().run().await;
                        ticker.reset();
                    }
                },
            }
        }

        debug!("poll loop exited");
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}

/// State shared by the loop and every tick it issues.
struct TickContext {
    source: Arc<dyn StatusSource>,
    presenter: Arc<ProgressPresenter>,
    termination: Arc<TerminationHandler>,
    timer: CancellationToken,
    completion: Mutex<()>,
}

impl TickContext {
    async fn run(self: Arc<Self>) {
        // A tick spawned alongside a terminal response must not issue a request.
        if self.timer.is_cancelled() {
            debug!("session stopped, skipping tick");
            return;
        }

        debug!("polling job status");
        let result = self.source.fetch_status().await;

        // Completion handlers never interleave, and none act once Stopped.
        let _guard = self.completion.lock().unwrap_or_else(|e| e.into_inner());
        if self.timer.is_cancelled() {
            debug!("session stopped, dropping late status response");
            return;
        }

        match result {
            Ok(response) => {
                self.presenter.update(response.progress);
                if let Some(outcome) = terminal_outcome(&response) {
                    self.termination.terminate(outcome);
                }
            }
            Err(e) => {
                warn!(error = %e, "status request failed");
                self.termination.terminate(Outcome::TransportFailure);
            }
        }
    }
}

fn terminal_outcome(response: &JobStatusResponse) -> Option<Outcome> {
    let job = response.job_uuid.as_deref().unwrap_or("-");
    match response.state()? {
        JobState::Finished => {
            info!(job, "job finished");
            Some(Outcome::Finished)
        }
        JobState::Failed => {
            warn!(
                job,
                reason = response.failure_reason.as_deref().unwrap_or(""),
                "job failed"
            );
            Some(Outcome::Failed)
        }
        _ => None,
    }
}
