use std::time::Duration;

use log::info;

use crate::error::{JenkinsError, Result};

use super::client::JenkinsClient;
use super::paths::JobPath;
use super::poll::{Poller, Probe};
use super::types::BuildStatus;

/// Waits until a build reaches a terminal state, returning the final snapshot.
///
/// Each iteration checks the timeout first, then fetches the build's status;
/// a terminal snapshot is returned immediately, a non-terminal one is
/// followed by an `interval` sleep. Because the deadline is checked before
/// the fetch rather than after, a build that finishes while the last
/// in-flight fetch straddles the deadline still comes back as a success.
///
/// Unlike queue resolution, fetch failures are not retried: the build is
/// known to exist by now, so any transport or decoding error aborts the wait.
pub async fn wait_for_build(
    client: &JenkinsClient,
    job: &JobPath,
    number: u32,
    timeout: Duration,
    interval: Duration,
) -> Result<BuildStatus> {
    let poller = Poller {
        timeout,
        interval,
        swallow_errors: false,
    };

    let status = poller
        .run(
            || async move {
                let status = client.build(job, number).await?;
                if status.is_terminal() {
                    Ok(Probe::Ready(status))
                } else {
                    Ok(Probe::Pending)
                }
            },
            || JenkinsError::BuildTimeout {
                job: job.display_name().to_string(),
                number,
                timeout,
            },
        )
        .await?;

    info!(
        "build {job} #{number} finished: {}",
        status
            .result
            .map(|r| r.to_string())
            .unwrap_or_else(|| "?".to_string())
    );
    Ok(status)
}
