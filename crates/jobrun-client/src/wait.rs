//! Polling wait loop: repeated get-run calls against a deadline.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use jobrun_core::{RunId, RunState, RunStatusSnapshot};

use crate::error::ClientError;
use crate::service::JobService;

/// Pause between consecutive status polls unless overridden.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Parameters for [`wait_for_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    /// Give up with `RunTimedOut` once this much time has elapsed.
    /// Unbounded when `None`.
    pub max_wait: Option<Duration>,

    /// Pause between consecutive polls. Fixed cadence.
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            max_wait: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitOptions {
    /// Unbounded wait at the default poll interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to bound the total wait time.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Builder method to change the poll cadence.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Poll a run until it reaches a terminal state or the deadline expires.
///
/// Returns the first terminal snapshot observed when the run succeeded; never
/// polls again after a terminal state. Non-success terminal states map to
/// `RunFailed`, `RunCanceled` or `RunUnknownState`, each carrying the final
/// snapshot for diagnostics. A `get_run` failure propagates immediately; the
/// loop does not retry transport errors.
pub async fn wait_for_run<S>(
    service: &S,
    run_id: RunId,
    options: &WaitOptions,
) -> Result<RunStatusSnapshot, ClientError>
where
    S: JobService + ?Sized,
{
    let started = Instant::now();
    loop {
        let snapshot = service.get_run(run_id).await?;
        match snapshot.state {
            RunState::Running => {}
            RunState::Succeeded => {
                info!(run_id = %run_id, "Run succeeded");
                return Ok(snapshot);
            }
            RunState::Failed => return Err(ClientError::RunFailed { snapshot }),
            RunState::Canceled => return Err(ClientError::RunCanceled { snapshot }),
            RunState::UnknownTerminal(code) => {
                return Err(ClientError::RunUnknownState { snapshot, code })
            }
        }

        let waited = started.elapsed();
        if let Some(max_wait) = options.max_wait {
            if waited >= max_wait {
                return Err(ClientError::RunTimedOut { run_id, waited });
            }
        }
        debug!(
            run_id = %run_id,
            waited_ms = waited.as_millis() as u64,
            "Run still in progress"
        );
        sleep(options.poll_interval).await;
    }
}
