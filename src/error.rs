use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JenkinsError {
    #[error("build did not start within {timeout:?} (queue item: {queue_path})")]
    QueueTimeout { queue_path: String, timeout: Duration },

    #[error("build {job} #{number} did not complete within {timeout:?}")]
    BuildTimeout {
        job: String,
        number: u32,
        timeout: Duration,
    },

    #[error("API request failed: status {status} for {path}")]
    Api { status: u16, path: String },

    #[error("malformed server response: {0}")]
    Malformed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, JenkinsError>;
