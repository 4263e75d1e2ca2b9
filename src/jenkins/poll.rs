use std::future::Future;
use std::time::Duration;

use log::debug;
use tokio::time::Instant;

use crate::error::{JenkinsError, Result};

/// Outcome of one poll attempt.
pub enum Probe<T> {
    /// The awaited condition holds; polling stops with this value.
    Ready(T),
    /// Not there yet; sleep one interval and try again.
    Pending,
}

/// Bounded polling engine shared by queue resolution and build waiting.
///
/// Fetch attempts are strictly sequential and the timeout is checked before
/// each fetch, so a result obtained by a fetch that straddles the deadline
/// is still returned. The `swallow_errors` flag captures a deliberate policy
/// split: queue resolution treats fetch failures as absence of a signal
/// (the item may not exist yet), while build waiting propagates them.
pub struct Poller {
    pub timeout: Duration,
    pub interval: Duration,
    pub swallow_errors: bool,
}

impl Poller {
    /// Runs `fetch` until it reports `Probe::Ready`, the timeout elapses, or
    /// (unless errors are swallowed) a fetch fails.
    ///
    /// `on_timeout` supplies the error for the expired case so each caller
    /// can attach its own context.
    pub async fn run<T, F, Fut>(
        &self,
        mut fetch: F,
        on_timeout: impl FnOnce() -> JenkinsError,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Probe<T>>>,
    {
        let started = Instant::now();

        loop {
            if started.elapsed() >= self.timeout {
                return Err(on_timeout());
            }

            match fetch().await {
                Ok(Probe::Ready(value)) => return Ok(value),
                Ok(Probe::Pending) => {}
                Err(err) if self.swallow_errors => {
                    debug!("poll attempt failed, retrying: {err}");
                }
                Err(err) => return Err(err),
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}
