//! Jenkins build lifecycle: submission, queue resolution, completion
//! polling, and progressive log streaming.

pub mod build;
pub mod client;
pub mod log;
pub mod paths;
pub mod poll;
pub mod queue;
pub mod types;

pub use self::build::wait_for_build;
pub use self::client::JenkinsClient;
pub use self::log::LogStream;
pub use self::paths::JobPath;
pub use self::queue::resolve_queue_item;
pub use self::types::{BuildResult, BuildStatus, LogCursor, QueueRef};
