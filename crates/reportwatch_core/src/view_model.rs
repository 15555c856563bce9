use crate::{ErrorKind, JobId};

/// Sites offered as one-click examples.
pub const EXAMPLE_URLS: [&str; 6] = [
    "https://www.nytimes.com",
    "https://www.bbc.com",
    "https://www.wikipedia.org",
    "https://www.apple.com",
    "https://www.microsoft.com",
    "https://www.tesla.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Complete,
    Failed,
    ConnectionError,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed | Self::ConnectionError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub input: String,
    pub input_error: Option<String>,
    /// URL being submitted, while the submission is in flight.
    pub submitted_url: Option<String>,
    pub job_id: Option<JobId>,
    pub status_message: Option<String>,
    /// Set only when the report is complete.
    pub result_url: Option<String>,
    pub error: Option<ErrorKind>,
    pub checks: u32,
    /// No job is in flight and the input is not blank.
    pub can_submit: bool,
}
