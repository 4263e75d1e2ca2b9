use url::Url;

/// Canonical server-relative path for a (possibly folder-nested) job.
///
/// Jenkins addresses every level of a folder hierarchy with a `job/` prefix,
/// so `folder1/folder2/myjob` becomes `job/folder1/job/folder2/job/myjob/`.
/// Normalization is idempotent: feeding an already-canonical path back in
/// yields the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPath {
    path: String,
    display: String,
}

impl JobPath {
    pub fn new(name: &str) -> Self {
        let segments: Vec<&str> = name
            .split('/')
            .filter(|s| !s.is_empty() && *s != "job")
            .collect();

        let mut path = String::new();
        for segment in &segments {
            path.push_str("job/");
            path.push_str(segment);
            path.push('/');
        }

        Self {
            path,
            display: segments.join("/"),
        }
    }

    /// Canonical path form, always ending with a trailing slash:
    /// `job/<seg>/job/<seg>/.../`
    pub fn as_path(&self) -> &str {
        &self.path
    }

    /// Human-readable `folder/.../name` form for messages and errors.
    pub fn display_name(&self) -> &str {
        &self.display
    }

    /// Path of the job's JSON representation.
    pub fn api_path(&self) -> String {
        api_json(&format!("/{}", self.path))
    }

    /// Path of one build's JSON representation.
    pub fn build_api_path(&self, number: u32) -> String {
        api_json(&format!("/{}{}/", self.path, number))
    }

    /// Path of one build's progressive console text.
    pub fn log_path(&self, number: u32) -> String {
        format!("/{}{}/logText/progressiveText", self.path, number)
    }

    /// Submission endpoint: `build` without parameters,
    /// `buildWithParameters` otherwise.
    pub fn submit_path(&self, with_params: bool) -> String {
        if with_params {
            format!("/{}buildWithParameters", self.path)
        } else {
            format!("/{}build", self.path)
        }
    }
}

impl std::fmt::Display for JobPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

/// Strips scheme and host from an absolute URL, keeping only the path.
///
/// Jenkins returns queue and build locations as full URLs; requests go out
/// relative to the configured base, so only the path component is kept.
/// Inputs that do not parse as absolute URLs pass through unchanged.
pub fn strip_base_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    }
}

/// Appends the JSON API suffix to a trailing-slash resource path.
pub fn api_json(path: &str) -> String {
    format!("{path}api/json")
}
