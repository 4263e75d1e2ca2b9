use std::time::Duration;

use log::info;

use crate::error::{JenkinsError, Result};

use super::client::JenkinsClient;
use super::poll::{Poller, Probe};
use super::types::QueueRef;

/// Default cadence for queue-item polls.
pub const QUEUE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Waits for a submitted build to leave the queue, returning its build number.
///
/// The queue item is polled once per interval until its JSON exposes an
/// `executable.number`, which means an executor picked the build up. Fetch
/// and decoding failures are treated as "not scheduled yet" — the item may
/// not even exist on the server for the first moments after submission — so
/// they are swallowed and polling continues until the timeout elapses.
pub async fn resolve_queue_item(
    client: &JenkinsClient,
    queue: &QueueRef,
    timeout: Duration,
) -> Result<u32> {
    resolve_queue_item_every(client, queue, timeout, QUEUE_POLL_INTERVAL).await
}

/// [`resolve_queue_item`] with an explicit poll interval.
pub async fn resolve_queue_item_every(
    client: &JenkinsClient,
    queue: &QueueRef,
    timeout: Duration,
    interval: Duration,
) -> Result<u32> {
    let poller = Poller {
        timeout,
        interval,
        swallow_errors: true,
    };

    let number = poller
        .run(
            || async move {
                let item = client.queue_item(queue).await?;
                match item.executable {
                    Some(executable) => Ok(Probe::Ready(executable.number)),
                    None => Ok(Probe::Pending),
                }
            },
            || JenkinsError::QueueTimeout {
                queue_path: queue.path().to_string(),
                timeout,
            },
        )
        .await?;

    info!("queue item {queue} resolved to build #{number}");
    Ok(number)
}
