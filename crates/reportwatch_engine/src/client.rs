use std::time::Duration;

use reportwatch_logging::watch_debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;

use crate::{ClientError, FailureKind, JobId, StatusReport, SubmitRequest, SubmitResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// The two endpoints of the report service.
#[async_trait::async_trait]
pub trait ReportService: Send + Sync {
    /// Creates a report job for `url` and returns its id.
    async fn submit(&self, url: &str) -> Result<JobId, ClientError>;

    /// Fetches the current status of a job.
    async fn status(&self, job_id: &str) -> Result<StatusReport, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestReportClient {
    client: reqwest::Client,
    base: Url,
}

impl ReqwestReportClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::new(
                FailureKind::InvalidUrl,
                format!("not an http base url: {base}"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::new(FailureKind::InvalidUrl, "base url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl ReportService for ReqwestReportClient {
    async fn submit(&self, url: &str) -> Result<JobId, ClientError> {
        let endpoint = self.endpoint(&["generate-report"])?;
        let body = serde_json::to_vec(&SubmitRequest {
            url: url.to_string(),
        })
        .map_err(|err| ClientError::new(FailureKind::Encode, err.to_string()))?;

        watch_debug!("POST {}", endpoint);
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let bytes = success_body(response).await?;
        let parsed: SubmitResponse = serde_json::from_slice(&bytes)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))?;
        if parsed.job_id.trim().is_empty() {
            return Err(ClientError::new(FailureKind::Decode, "empty job_id"));
        }
        Ok(parsed.job_id)
    }

    async fn status(&self, job_id: &str) -> Result<StatusReport, ClientError> {
        let endpoint = self.endpoint(&["report-status", job_id])?;

        watch_debug!("GET {}", endpoint);
        let response = self
            .client
            .get(endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let bytes = success_body(response).await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
    }
}

async fn success_body(response: reqwest::Response) -> Result<Vec<u8>, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    Ok(bytes.to_vec())
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::new(FailureKind::Decode, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
