use std::sync::Arc;
use tokio::sync::watch;

/// Default maximum of the host page's progress element.
pub const DEFAULT_PROGRESS_MAX: f64 = 100.0;

/// The visible progress element the monitor writes to.
pub trait ProgressIndicator: Send + Sync {
    fn set_value(&self, value: f64);
}

impl<F> ProgressIndicator for F
where
    F: Fn(f64) + Send + Sync,
{
    fn set_value(&self, value: f64) {
        self(value)
    }
}

/// Applies polled progress values to an indicator.
///
/// Zero, negative and missing values are not meaningful updates and leave the
/// indicator untouched. Everything else is passed through unmodified, so a
/// value that drops between ticks is shown as received.
pub struct ProgressPresenter {
    indicator: Arc<dyn ProgressIndicator>,
}

impl ProgressPresenter {
    pub fn new(indicator: Arc<dyn ProgressIndicator>) -> Self {
        Self { indicator }
    }

    /// Returns true if the indicator was written.
    pub fn update(&self, progress: Option<f64>) -> bool {
        match progress {
            Some(value) if value > 0.0 => {
                self.indicator.set_value(value);
                true
            }
            _ => false,
        }
    }
}

/// In-memory progress element with a fixed maximum.
///
/// The maximum is informational only; values above it are stored as given.
pub struct ProgressBar {
    max: f64,
    value: watch::Sender<f64>,
}

impl ProgressBar {
    pub fn new(max: f64) -> Self {
        let (value, _) = watch::channel(0.0);
        Self { max, value }
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn value(&self) -> f64 {
        *self.value.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.value.subscribe()
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_MAX)
    }
}

impl ProgressIndicator for ProgressBar {
    fn set_value(&self, value: f64) {
        self.value.send_replace(value);
    }
}
