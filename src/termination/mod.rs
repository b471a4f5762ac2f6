use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Reloads the hosting page so it re-renders with the job's final state.
pub trait PageReloader: Send + Sync {
    fn reload(&self);
}

impl<F> PageReloader for F
where
    F: Fn() + Send + Sync,
{
    fn reload(&self) {
        self()
    }
}

/// Why the session ended. Used for logging only; every outcome reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    Failed,
    TransportFailure,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Finished => "finished",
            Outcome::Failed => "failed",
            Outcome::TransportFailure => "transport failure",
        };
        f.write_str(label)
    }
}

/// Stops polling and reloads the page, once per session.
pub struct TerminationHandler {
    timer: CancellationToken,
    reloader: Arc<dyn PageReloader>,
    fired: AtomicBool,
}

impl TerminationHandler {
    pub fn new(timer: CancellationToken, reloader: Arc<dyn PageReloader>) -> Self {
        Self {
            timer,
            reloader,
            fired: AtomicBool::new(false),
        }
    }

    /// Cancel the timer, then reload. Returns false if the session had
    /// already terminated, in which case nothing happens.
    pub fn terminate(&self, outcome: Outcome) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.timer.cancel();
        info!(%outcome, "job monitoring ended, reloading page");
        self.reloader.reload();
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_handler() -> (TerminationHandler, CancellationToken, Arc<AtomicUsize>) {
        let token = CancellationToken::new();
        let reloads = Arc::new(AtomicUsize::new(0));
        let counter = reloads.clone();
        let handler = TerminationHandler::new(
            token.clone(),
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (handler, token, reloads)
    }

    #[test]
    fn test_terminate_cancels_timer_and_reloads() {
        let (handler, token, reloads) = counting_handler();

        assert!(handler.terminate(Outcome::Finished));
        assert!(token.is_cancelled());
        assert!(handler.has_fired());
        assert_eq!(reloads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_terminate_reloads_only_once() {
        let (handler, _token, reloads) = counting_handler();

        assert!(handler.terminate(Outcome::Failed));
        assert!(!handler.terminate(Outcome::Finished));
        assert!(!handler.terminate(Outcome::TransportFailure));
        assert_eq!(reloads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancelled_timer_does_not_block_termination() {
        let (handler, token, reloads) = counting_handler();
        token.cancel();

        assert!(handler.terminate(Outcome::TransportFailure));
        assert_eq!(reloads.load(Ordering::SeqCst), 1);
    }
}
