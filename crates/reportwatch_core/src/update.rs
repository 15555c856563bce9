use reportwatch_logging::{watch_debug, watch_info, watch_warn};

use crate::{messages, AppState, Effect, ErrorKind, JobStatus, Msg, SessionState, EXAMPLE_URLS};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            if state.session().is_busy() {
                return (state, Vec::new());
            }
            state.set_input(text);
            Vec::new()
        }
        Msg::ExampleSelected(index) => {
            if state.session().is_busy() {
                return (state, Vec::new());
            }
            match EXAMPLE_URLS.get(index) {
                Some(url) => state.set_input((*url).to_string()),
                None => return (state, Vec::new()),
            }
            Vec::new()
        }
        Msg::UrlSubmitted => {
            let url = state.input().trim().to_owned();
            if url.is_empty() {
                return (state, Vec::new());
            }
            if state.session().is_busy() {
                watch_debug!("Submission ignored, a job is already in flight");
                return (state, Vec::new());
            }
            if !is_submittable_url(&url) {
                state.reject_input(messages::INVALID_URL);
                return (state, Vec::new());
            }

            watch_info!("Submitting url={}", url);
            state.set_session(SessionState::Submitting { url: url.clone() });
            // A previous job's timer must never outlive a new submission.
            vec![Effect::StopPolling, Effect::SubmitUrl { url }]
        }
        Msg::SubmitAccepted { job_id } => {
            if !matches!(state.session(), SessionState::Submitting { .. }) {
                watch_debug!("Ignoring late submission result job_id={}", job_id);
                return (state, Vec::new());
            }
            watch_info!("Job accepted job_id={}", job_id);
            state.set_session(SessionState::Polling {
                job_id: job_id.clone(),
                status: JobStatus::Queued,
                checks: 0,
            });
            vec![Effect::StartPolling { job_id }]
        }
        Msg::SubmitFailed { reason } => {
            if !matches!(state.session(), SessionState::Submitting { .. }) {
                return (state, Vec::new());
            }
            watch_warn!("Submission failed: {}", reason);
            state.set_session(SessionState::ConnectionError {
                kind: ErrorKind::SubmissionFailed,
                detail: reason,
            });
            Vec::new()
        }
        Msg::StatusObserved {
            job_id,
            status,
            result,
        } => {
            if state.session().polling_job() != Some(job_id.as_str()) {
                watch_debug!("Ignoring status for stale job_id={}", job_id);
                return (state, Vec::new());
            }
            match status {
                JobStatus::Complete => {
                    watch_info!("Job complete job_id={} result={}", job_id, result);
                    state.set_session(SessionState::Complete {
                        job_id,
                        result_url: result,
                    });
                    vec![Effect::StopPolling]
                }
                JobStatus::Failed => {
                    watch_warn!("Job failed job_id={} reason={}", job_id, result);
                    state.set_session(SessionState::Failed {
                        job_id,
                        reason: result,
                    });
                    vec![Effect::StopPolling]
                }
                JobStatus::Queued
                | JobStatus::FetchingData
                | JobStatus::GeneratingText
                | JobStatus::CreatingPresentation => {
                    state.record_progress(status);
                    Vec::new()
                }
            }
        }
        Msg::PollFailed { job_id, reason } => {
            if state.session().polling_job() != Some(job_id.as_str()) {
                return (state, Vec::new());
            }
            watch_warn!("Status check failed job_id={}: {}", job_id, reason);
            state.set_session(SessionState::ConnectionError {
                kind: ErrorKind::PollingTransportFailed,
                detail: reason,
            });
            vec![Effect::StopPolling]
        }
        Msg::CopyResultClicked => match state.session() {
            SessionState::Complete { result_url, .. } if !result_url.is_empty() => {
                vec![Effect::CopyToClipboard {
                    text: result_url.clone(),
                }]
            }
            _ => Vec::new(),
        },
        Msg::ShutdownRequested => {
            if state.session().is_busy() {
                state.set_session(SessionState::Idle);
            }
            vec![Effect::StopPolling, Effect::Quit]
        }
    };

    (state, effects)
}

fn is_submittable_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::is_submittable_url;

    #[test]
    fn only_absolute_http_urls_are_submittable() {
        assert!(is_submittable_url("https://example.com"));
        assert!(is_submittable_url("http://localhost:8080/path?q=1"));
        assert!(!is_submittable_url("example.com"));
        assert!(!is_submittable_url("ftp://example.com"));
        assert!(!is_submittable_url("https://"));
        assert!(!is_submittable_url("not a url"));
    }
}
