#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the URL to the job-creation endpoint.
    SubmitUrl { url: String },
    /// Begin periodic status checks for a job. Replaces any running poll.
    StartPolling { job_id: crate::JobId },
    /// Cancel the poll timer, if any.
    StopPolling,
    CopyToClipboard { text: String },
    /// Shell should exit its main loop.
    Quit,
}
