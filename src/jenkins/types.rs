use serde::Deserialize;

use super::paths::strip_base_url;

/// Result states Jenkins assigns to a finished build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Failure,
    Aborted,
    Unstable,
    NotBuilt,
    /// Anything the server reports that this client does not know about.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Failure => "FAILURE",
            BuildResult::Aborted => "ABORTED",
            BuildResult::Unstable => "UNSTABLE",
            BuildResult::NotBuilt => "NOT_BUILT",
            BuildResult::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Snapshot of a build's state as reported by `<build>/api/json`.
///
/// Snapshots are immutable; a fresh state is obtained only by fetching again.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
    pub result: Option<BuildResult>,
    #[serde(default)]
    pub building: bool,
    #[serde(default)]
    pub in_progress: bool,
    /// Build start time, epoch milliseconds.
    #[serde(default)]
    pub timestamp: u64,
    /// Build duration, milliseconds. Zero while running.
    #[serde(default)]
    pub duration: u64,
    pub url: Option<String>,
    /// Raw action entries; parameter extraction digs into these.
    #[serde(default)]
    pub actions: Vec<serde_json::Value>,
}

impl BuildStatus {
    /// A build is terminal once it has a known result and the server reports
    /// neither active execution nor pending post-processing.
    pub fn is_terminal(&self) -> bool {
        matches!(self.result, Some(r) if r != BuildResult::Unknown)
            && !self.building
            && !self.in_progress
    }

    /// Parameters the build ran with, in the order the server lists them.
    ///
    /// Jenkins exposes them inside the `actions` array as
    /// `{"parameters": [{"name": ..., "value": ...}]}`. Non-string values
    /// (booleans, numbers) are rendered to their plain text form.
    pub fn parameters(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for action in &self.actions {
            let Some(entries) = action.get("parameters").and_then(|p| p.as_array()) else {
                continue;
            };
            for entry in entries {
                let Some(name) = entry.get("name").and_then(|n| n.as_str()) else {
                    continue;
                };
                let value = match entry.get("value") {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(serde_json::Value::Bool(b)) => b.to_string(),
                    Some(serde_json::Value::Number(n)) => n.to_string(),
                    _ => continue,
                };
                params.push((name.to_string(), value));
            }
        }
        params
    }
}

/// Queue item JSON; `executable` appears once the build has been scheduled.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueItem {
    pub executable: Option<Executable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Executable {
    pub number: u32,
}

/// Job JSON, reduced to what last-build lookup needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub last_build: Option<BuildRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildRef {
    pub number: u32,
}

/// Server-relative location of a pending queue item.
#[derive(Debug, Clone)]
pub struct QueueRef {
    path: String,
}

impl QueueRef {
    /// Normalizes a queue location (usually an absolute URL from the
    /// `Location` response header) into a server-relative path.
    pub fn new(location: &str) -> Self {
        Self {
            path: strip_base_url(location),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Display for QueueRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

/// Progress through a build's console text.
///
/// The offset only ever moves forward; `done` latches once the server
/// signals the end of the stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCursor {
    pub offset: u64,
    pub done: bool,
}

/// One fetched slice of console text plus the server's control signals.
#[derive(Debug, Clone)]
pub struct LogChunk {
    pub text: String,
    /// New total byte size reported via `X-Text-Size`.
    pub size: u64,
    /// `X-More-Data` signal; only an explicit `"false"` clears it.
    pub more_data: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(result: Option<BuildResult>, building: bool, in_progress: bool) -> BuildStatus {
        BuildStatus {
            result,
            building,
            in_progress,
            timestamp: 0,
            duration: 0,
            url: None,
            actions: Vec::new(),
        }
    }

    #[test]
    fn test_terminal_requires_result_and_no_activity() {
        assert!(status(Some(BuildResult::Success), false, false).is_terminal());
        assert!(status(Some(BuildResult::Failure), false, false).is_terminal());
        assert!(!status(Some(BuildResult::Success), true, false).is_terminal());
        assert!(!status(Some(BuildResult::Success), false, true).is_terminal());
        assert!(!status(None, false, false).is_terminal());
        assert!(!status(Some(BuildResult::Unknown), false, false).is_terminal());
    }

    #[test]
    fn test_build_status_deserializes_jenkins_payload() {
        let json = r#"{
            "result": "NOT_BUILT",
            "building": false,
            "inProgress": false,
            "timestamp": 1720000000000,
            "duration": 12500,
            "url": "https://jenkins.example.com/job/myjob/42/"
        }"#;
        let status: BuildStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.result, Some(BuildResult::NotBuilt));
        assert!(status.is_terminal());
        assert_eq!(status.duration, 12500);
    }

    #[test]
    fn test_running_build_has_no_result() {
        let json = r#"{"result": null, "building": true, "inProgress": true}"#;
        let status: BuildStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.result, None);
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_unrecognized_result_is_unknown() {
        let json = r#"{"result": "SOMETHING_NEW", "building": false}"#;
        let status: BuildStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.result, Some(BuildResult::Unknown));
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_parameters_from_actions() {
        let json = r#"{
            "building": false,
            "actions": [
                {"_class": "hudson.model.CauseAction"},
                {"parameters": [
                    {"name": "BRANCH", "value": "main"},
                    {"name": "CLEAN", "value": true},
                    {"name": "RETRIES", "value": 3}
                ]}
            ]
        }"#;
        let status: BuildStatus = serde_json::from_str(json).unwrap();
        assert_eq!(
            status.parameters(),
            vec![
                ("BRANCH".to_string(), "main".to_string()),
                ("CLEAN".to_string(), "true".to_string()),
                ("RETRIES".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_queue_ref_strips_host() {
        let queue = QueueRef::new("https://jenkins.example.com/queue/item/123/");
        assert_eq!(queue.path(), "/queue/item/123/");
    }
}
