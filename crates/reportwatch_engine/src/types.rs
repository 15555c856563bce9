use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub type JobId = String;

/// Body of `POST /generate-report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitRequest {
    pub url: String,
}

/// Reply of `POST /generate-report`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    pub job_id: JobId,
}

/// Reply of `GET /report-status/{job_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReport {
    /// Raw status tag. Missing, null or non-string tags decode as empty and
    /// count as unrecognized.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub status: String,
    /// Result URL when complete, failure reason when failed.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub result: String,
}

impl StatusReport {
    pub fn remote_status(&self) -> RemoteStatus {
        RemoteStatus::from_tag(&self.status)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(tag) => Ok(tag),
        _ => Ok(String::new()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    FetchingData,
    GeneratingText,
    CreatingPresentation,
    Complete,
    Failed,
    Unrecognized,
}

impl RemoteStatus {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "fetching_data" => Self::FetchingData,
            "generating_text" => Self::GeneratingText,
            "creating_presentation" => Self::CreatingPresentation,
            "complete" => Self::Complete,
            "failed" => Self::Failed,
            _ => Self::Unrecognized,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SubmitCompleted {
        result: Result<JobId, ClientError>,
    },
    StatusChecked {
        job_id: JobId,
        result: Result<StatusReport, ClientError>,
    },
    /// The poll task for `job_id` has exited and will issue no more requests.
    PollingStopped { job_id: JobId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Encode,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Encode => write!(f, "could not encode request"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_report_tolerates_missing_or_null_result() {
        let report: StatusReport = serde_json::from_str(r#"{"status":"fetching_data"}"#).unwrap();
        assert_eq!(report.result, "");
        assert_eq!(report.remote_status(), RemoteStatus::FetchingData);

        let report: StatusReport =
            serde_json::from_str(r#"{"status":"queued","result":null}"#).unwrap();
        assert_eq!(report.result, "");
        assert_eq!(report.remote_status(), RemoteStatus::Unrecognized);
    }

    #[test]
    fn status_report_tolerates_missing_or_odd_status() {
        for body in [
            r#"{"result":""}"#,
            r#"{"status":null,"result":""}"#,
            r#"{"status":3}"#,
            r#"{"status":{"phase":"complete"}}"#,
        ] {
            let report: StatusReport = serde_json::from_str(body).unwrap();
            assert_eq!(report.status, "", "body {body}");
            assert_eq!(report.remote_status(), RemoteStatus::Unrecognized);
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(RemoteStatus::Complete.is_terminal());
        assert!(RemoteStatus::Failed.is_terminal());
        assert!(!RemoteStatus::CreatingPresentation.is_terminal());
        assert!(!RemoteStatus::Unrecognized.is_terminal());
    }

    #[test]
    fn client_error_display_includes_kind() {
        let err = ClientError::new(FailureKind::HttpStatus(500), "Internal Server Error");
        assert_eq!(err.to_string(), "http status 500: Internal Server Error");
    }
}
