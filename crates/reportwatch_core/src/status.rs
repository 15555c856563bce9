/// Job status as reported by the report service.
///
/// Anything the client does not recognize is treated as [`JobStatus::Queued`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Queued,
    FetchingData,
    GeneratingText,
    CreatingPresentation,
    Complete,
    Failed,
}

impl JobStatus {
    /// Non-terminal phases in the order the service moves through them.
    pub const PHASES: [JobStatus; 3] = [
        JobStatus::FetchingData,
        JobStatus::GeneratingText,
        JobStatus::CreatingPresentation,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "fetching_data" => Self::FetchingData,
            "generating_text" => Self::GeneratingText,
            "creating_presentation" => Self::CreatingPresentation,
            "complete" => Self::Complete,
            "failed" => Self::Failed,
            _ => Self::Queued,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Progress line shown while polling. `None` for terminal statuses, which
    /// are rendered from the result instead.
    pub fn progress_message(self) -> Option<&'static str> {
        match self {
            Self::Queued => Some(messages::QUEUED),
            Self::FetchingData => Some(messages::FETCHING_DATA),
            Self::GeneratingText => Some(messages::GENERATING_TEXT),
            Self::CreatingPresentation => Some(messages::CREATING_PRESENTATION),
            Self::Complete | Self::Failed => None,
        }
    }
}

/// User-facing texts.
pub mod messages {
    pub const SUBMITTING: &str = "Submitting your site to the report service...";
    pub const QUEUED: &str = "Job queued, waiting for a worker...";
    pub const FETCHING_DATA: &str = "Fetching SEO data for the site...";
    pub const GENERATING_TEXT: &str = "Writing the report text...";
    pub const CREATING_PRESENTATION: &str = "Building the presentation...";
    pub const COMPLETE: &str = "Your report is ready.";
    pub const FAILED_PREFIX: &str = "Report generation failed";
    pub const CONNECTION_ERROR: &str = "Could not reach the report service. Please try again.";
    pub const INVALID_URL: &str = "Enter a full http(s) URL, e.g. https://example.com";
    pub const ALREADY_RUNNING: &str =
        "A report is already being generated. Wait for it to finish first.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_map_to_variants() {
        assert_eq!(JobStatus::from_tag("fetching_data"), JobStatus::FetchingData);
        assert_eq!(JobStatus::from_tag("generating_text"), JobStatus::GeneratingText);
        assert_eq!(
            JobStatus::from_tag("creating_presentation"),
            JobStatus::CreatingPresentation
        );
        assert_eq!(JobStatus::from_tag("complete"), JobStatus::Complete);
        assert_eq!(JobStatus::from_tag("failed"), JobStatus::Failed);
        assert_eq!(JobStatus::from_tag("pending"), JobStatus::Queued);
        assert_eq!(JobStatus::from_tag(""), JobStatus::Queued);
        assert_eq!(JobStatus::from_tag("COMPLETE"), JobStatus::Queued);
    }

    #[test]
    fn only_complete_and_failed_are_terminal() {
        for status in JobStatus::PHASES {
            assert!(!status.is_terminal());
            assert!(status.progress_message().is_some());
        }
        assert!(!JobStatus::Queued.is_terminal());
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert_eq!(JobStatus::Complete.progress_message(), None);
    }

    #[test]
    fn phase_messages_are_distinct() {
        let mut seen: Vec<&str> = JobStatus::PHASES
            .iter()
            .filter_map(|status| status.progress_message())
            .collect();
        seen.push(messages::QUEUED);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }
}
