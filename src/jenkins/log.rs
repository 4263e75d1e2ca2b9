use std::time::Duration;

use crate::error::Result;

use super::client::JenkinsClient;
use super::paths::JobPath;
use super::types::LogCursor;

/// Default pause between progressive-log fetches.
pub const LOG_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Pull-based stream over a build's progressive console text.
///
/// Each call to [`next_chunk`](Self::next_chunk) fetches the text that
/// accumulated past the cursor offset and advances the cursor to the total
/// size the server reports. The stream ends when the server signals no more
/// data or returns an empty/whitespace-only chunk — whichever comes first.
/// There is no timeout here; a build that never finishes produces chunks
/// until the caller stops pulling, so callers wanting a bound should wait
/// for build completion first or race an external deadline.
pub struct LogStream<'a> {
    client: &'a JenkinsClient,
    job: &'a JobPath,
    number: u32,
    cursor: LogCursor,
    interval: Duration,
    fetched_once: bool,
}

impl<'a> LogStream<'a> {
    pub fn new(client: &'a JenkinsClient, job: &'a JobPath, number: u32) -> Self {
        Self::from_cursor(client, job, number, LogCursor::default())
    }

    /// Resumes streaming from a previously saved cursor.
    pub fn from_cursor(
        client: &'a JenkinsClient,
        job: &'a JobPath,
        number: u32,
        cursor: LogCursor,
    ) -> Self {
        Self {
            client,
            job,
            number,
            cursor,
            interval: LOG_POLL_INTERVAL,
            fetched_once: false,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Where the stream currently stands; survives the stream itself, so a
    /// later stream can pick up from here.
    pub fn cursor(&self) -> LogCursor {
        self.cursor
    }

    /// Fetches the next chunk of console text, or `None` once the stream is
    /// exhausted. Sleeps the poll interval between consecutive fetches but
    /// never before the first one.
    pub async fn next_chunk(&mut self) -> Result<Option<String>> {
        if self.cursor.done {
            return Ok(None);
        }

        if self.fetched_once {
            tokio::time::sleep(self.interval).await;
        }
        self.fetched_once = true;

        let chunk = self
            .client
            .log_chunk(self.job, self.number, self.cursor.offset)
            .await?;

        // The reported size never moves the cursor backwards.
        if chunk.size > self.cursor.offset {
            self.cursor.offset = chunk.size;
        }

        if !chunk.more_data || chunk.text.trim().is_empty() {
            self.cursor.done = true;
        }

        if chunk.text.is_empty() {
            return Ok(None);
        }

        Ok(Some(chunk.text))
    }
}
