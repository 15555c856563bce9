use crate::view_model::{AppViewModel, Phase};
use crate::{messages, JobStatus};

/// Opaque job identifier handed out by the report service.
pub type JobId = String;

/// Why a job ended without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Job creation failed: network error or non-2xx.
    SubmissionFailed,
    /// A status check failed: network error or non-2xx.
    PollingTransportFailed,
    /// The service reported `failed`.
    JobFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Submitting {
        url: String,
    },
    Polling {
        job_id: JobId,
        status: JobStatus,
        /// Status checks observed for this job so far.
        checks: u32,
    },
    Complete {
        job_id: JobId,
        result_url: String,
    },
    Failed {
        job_id: JobId,
        reason: String,
    },
    ConnectionError {
        kind: ErrorKind,
        detail: String,
    },
}

impl SessionState {
    /// A submission or poll loop is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting { .. } | Self::Polling { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Complete { .. } | Self::Failed { .. } | Self::ConnectionError { .. }
        )
    }

    /// Job id currently being polled.
    pub fn polling_job(&self) -> Option<&str> {
        match self {
            Self::Polling { job_id, .. } => Some(job_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    input_error: Option<String>,
    session: SessionState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let (phase, job_id, status_message, result_url, error, checks) = match &self.session {
            SessionState::Idle => (Phase::Idle, None, None, None, None, 0),
            SessionState::Submitting { .. } => (
                Phase::Submitting,
                None,
                Some(messages::SUBMITTING.to_string()),
                None,
                None,
                0,
            ),
            SessionState::Polling {
                job_id,
                status,
                checks,
            } => (
                Phase::Polling,
                Some(job_id.clone()),
                status.progress_message().map(str::to_string),
                None,
                None,
                *checks,
            ),
            SessionState::Complete { job_id, result_url } => (
                Phase::Complete,
                Some(job_id.clone()),
                Some(messages::COMPLETE.to_string()),
                Some(result_url.clone()),
                None,
                0,
            ),
            SessionState::Failed { job_id, reason } => (
                Phase::Failed,
                Some(job_id.clone()),
                Some(failure_message(reason)),
                None,
                Some(ErrorKind::JobFailed),
                0,
            ),
            SessionState::ConnectionError { kind, .. } => (
                Phase::ConnectionError,
                None,
                Some(messages::CONNECTION_ERROR.to_string()),
                None,
                Some(*kind),
                0,
            ),
        };

        let submitted_url = match &self.session {
            SessionState::Submitting { url } => Some(url.clone()),
            _ => None,
        };

        AppViewModel {
            phase,
            input: self.input.clone(),
            input_error: self.input_error.clone(),
            submitted_url,
            job_id,
            status_message,
            result_url,
            error,
            checks,
            can_submit: !self.session.is_busy() && !self.input.trim().is_empty(),
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text || self.input_error.is_some() {
            self.input = text;
            self.input_error = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn reject_input(&mut self, message: &str) {
        self.input_error = Some(message.to_string());
        self.mark_dirty();
    }

    pub(crate) fn set_session(&mut self, session: SessionState) {
        self.session = session;
        self.mark_dirty();
    }

    pub(crate) fn record_progress(&mut self, observed: JobStatus) {
        if let SessionState::Polling { status, checks, .. } = &mut self.session {
            *status = observed;
            *checks += 1;
            self.dirty = true;
        }
    }
}

fn failure_message(reason: &str) -> String {
    let reason = reason.trim();
    if reason.is_empty() {
        messages::FAILED_PREFIX.to_string()
    } else {
        format!("{}: {}", messages::FAILED_PREFIX, reason)
    }
}
