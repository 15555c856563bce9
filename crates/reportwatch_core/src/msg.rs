#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input.
    InputChanged(String),
    /// User picked one of the built-in example sites.
    ExampleSelected(usize),
    /// User submitted the current URL input.
    UrlSubmitted,
    /// Engine: the service accepted the submission.
    SubmitAccepted { job_id: crate::JobId },
    /// Engine: the submission request failed (transport or non-2xx).
    SubmitFailed { reason: String },
    /// Engine: a status check for `job_id` returned.
    StatusObserved {
        job_id: crate::JobId,
        status: crate::JobStatus,
        result: String,
    },
    /// Engine: a status check for `job_id` failed (transport or non-2xx).
    PollFailed { job_id: crate::JobId, reason: String },
    /// User asked to copy the result link.
    CopyResultClicked,
    /// The shell is being torn down.
    ShutdownRequested,
}
