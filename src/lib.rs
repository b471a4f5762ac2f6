//! # RQ Job Monitor
//!
//! Client-side progress monitor for a long-running background job.
//!
//! ## Features
//!
//! - Fixed-period polling of a JSON status endpoint
//! - Progress forwarding to any indicator (only values above zero are applied)
//! - Stop-and-reload on `FINISHED`, `FAILED` or any transport failure
//! - One owned session per page view, no state shared across sessions
//!
//! ```no_run
//! use rq_job_monitor::{PollingController, ProgressBar, SessionConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), rq_job_monitor::MonitorError> {
//! let bar = Arc::new(ProgressBar::default());
//! let controller = PollingController::new(bar.clone(), Arc::new(|| println!("reload")));
//!
//! let config = SessionConfig {
//!     base_url: Some("https://admin.example.com/".parse().unwrap()),
//!     ..SessionConfig::job_run_page(Some("/job/status/42/".to_string()), true)
//! };
//! if controller.start(&config)? {
//!     controller.stopped().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod presenter;
pub mod termination;

pub use client::types::{JobState, JobStatusResponse};
pub use client::{StatusClient, StatusSource};
pub use config::{SessionConfig, StartGate};
pub use error::{MonitorError, MonitorResult};
pub use poller::{PollState, PollingController, TickPolicy};
pub use presenter::{ProgressBar, ProgressIndicator, ProgressPresenter};
pub use termination::{Outcome, PageReloader, TerminationHandler};

/// Tick period of the job run page, gated on the job already running
pub const JOB_RUN_POLL_INTERVAL_MS: u64 = 500;

/// Tick period of the standalone status page
pub const STATUS_PAGE_POLL_INTERVAL_MS: u64 = 750;
