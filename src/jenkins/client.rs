use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::error::{JenkinsError, Result};

use super::paths::{api_json, JobPath};
use super::types::{BuildStatus, JobInfo, LogChunk, QueueItem, QueueRef};

/// Jenkins API client.
///
/// Wraps a pre-configured HTTP client with the server base URL and optional
/// user/API-token credentials (Jenkins basic auth). The client holds no
/// request state of its own, so one instance can serve queue polling, build
/// waiting, and log streaming interchangeably.
#[derive(Clone)]
pub struct JenkinsClient {
    client: reqwest::Client,
    base_url: String,
    user: Option<String>,
    token: Option<String>,
}

impl JenkinsClient {
    pub fn new(base_url: &str, user: Option<String>, token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("jenkinsctl/0.3"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| JenkinsError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user,
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(user) = &self.user {
            request.basic_auth(user, self.token.as_deref())
        } else {
            request
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {path}");
        let response = self
            .auth_request(self.client.get(self.url(path)))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JenkinsError::Api {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        Ok(response.json().await?)
    }

    /// Submits a build for `job`, returning the queue location the server
    /// assigns via the `Location` response header.
    pub async fn submit_build(&self, job: &JobPath, params: &[(String, String)]) -> Result<QueueRef> {
        let path = job.submit_path(!params.is_empty());
        debug!("POST {path}");

        let mut request = self.auth_request(self.client.post(self.url(&path)));
        if !params.is_empty() {
            request = request.form(params);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(JenkinsError::Api {
                status: status.as_u16(),
                path,
            });
        }

        let location = response
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                JenkinsError::Malformed("build submission returned no Location header".to_string())
            })?;

        Ok(QueueRef::new(location))
    }

    /// Fetches the queue item's JSON representation.
    pub async fn queue_item(&self, queue: &QueueRef) -> Result<QueueItem> {
        self.get_json(&api_json(queue.path())).await
    }

    /// Fetches the current status snapshot of one build.
    pub async fn build(&self, job: &JobPath, number: u32) -> Result<BuildStatus> {
        self.get_json(&job.build_api_path(number)).await
    }

    /// Fetches the job's JSON representation (last-build lookup).
    pub async fn job_info(&self, job: &JobPath) -> Result<JobInfo> {
        self.get_json(&job.api_path()).await
    }

    /// Resolves an omitted build number to the job's most recent build.
    pub async fn last_build_number(&self, job: &JobPath) -> Result<u32> {
        let info = self.job_info(job).await?;
        info.last_build
            .map(|b| b.number)
            .ok_or_else(|| JenkinsError::Malformed(format!("job {job} has no builds")))
    }

    /// Fetches one slice of console text starting at `offset`.
    ///
    /// The response carries two out-of-band control signals: `X-Text-Size`
    /// (the new total byte size, required) and `X-More-Data` (whether more
    /// output may follow; anything but an explicit `"false"` means yes).
    pub async fn log_chunk(&self, job: &JobPath, number: u32, offset: u64) -> Result<LogChunk> {
        let path = job.log_path(number);
        debug!("GET {path} start={offset}");

        let response = self
            .auth_request(
                self.client
                    .get(self.url(&path))
                    .query(&[("start", offset.to_string())]),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JenkinsError::Api {
                status: status.as_u16(),
                path,
            });
        }

        let size = response
            .headers()
            .get("X-Text-Size")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| {
                JenkinsError::Malformed("log response missing X-Text-Size header".to_string())
            })?;

        let more_data = response
            .headers()
            .get("X-More-Data")
            .and_then(|v| v.to_str().ok())
            .map(|v| v != "false")
            .unwrap_or(true);

        let text = response.text().await?;

        Ok(LogChunk {
            text,
            size,
            more_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_build_without_params_returns_queue_ref() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/job/myjob/build")
            .with_status(201)
            .with_header(
                "Location",
                &format!("{}/queue/item/123/", server.url()),
            )
            .create_async()
            .await;

        let client = JenkinsClient::new(&server.url(), None, None).unwrap();
        let job = JobPath::new("myjob");
        let queue = client.submit_build(&job, &[]).await.unwrap();

        assert_eq!(queue.path(), "/queue/item/123/");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_build_with_params_posts_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/job/myjob/buildWithParameters")
            .match_body(mockito::Matcher::UrlEncoded(
                "BRANCH".to_string(),
                "main".to_string(),
            ))
            .with_status(201)
            .with_header("Location", "https://jenkins.example.com/queue/item/9/")
            .create_async()
            .await;

        let client = JenkinsClient::new(&server.url(), None, None).unwrap();
        let job = JobPath::new("myjob");
        let params = vec![("BRANCH".to_string(), "main".to_string())];
        let queue = client.submit_build(&job, &params).await.unwrap();

        assert_eq!(queue.path(), "/queue/item/9/");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_build_missing_location_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/job/myjob/build")
            .with_status(201)
            .create_async()
            .await;

        let client = JenkinsClient::new(&server.url(), None, None).unwrap();
        let job = JobPath::new("myjob");
        let result = client.submit_build(&job, &[]).await;

        assert!(matches!(result, Err(JenkinsError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_http_error_carries_status_and_path() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/job/myjob/5/api/json")
            .with_status(500)
            .create_async()
            .await;

        let client = JenkinsClient::new(&server.url(), None, None).unwrap();
        let job = JobPath::new("myjob");
        let result = client.build(&job, 5).await;

        match result {
            Err(JenkinsError::Api { status, path }) => {
                assert_eq!(status, 500);
                assert_eq!(path, "/job/myjob/5/api/json");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_last_build_number() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/job/myjob/api/json")
            .with_status(200)
            .with_body(r#"{"lastBuild": {"number": 58}}"#)
            .create_async()
            .await;

        let client = JenkinsClient::new(&server.url(), None, None).unwrap();
        let job = JobPath::new("myjob");
        assert_eq!(client.last_build_number(&job).await.unwrap(), 58);
    }

    #[tokio::test]
    async fn test_last_build_number_without_builds_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/job/myjob/api/json")
            .with_status(200)
            .with_body(r#"{"lastBuild": null}"#)
            .create_async()
            .await;

        let client = JenkinsClient::new(&server.url(), None, None).unwrap();
        let job = JobPath::new("myjob");
        let result = client.last_build_number(&job).await;

        assert!(matches!(result, Err(JenkinsError::Malformed(_))));
    }
}
