use reportwatch_core::{AppViewModel, Phase, EXAMPLE_URLS};

/// Lines to print for the current view. Empty when there is nothing new to show.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(error) = &view.input_error {
        lines.push(format!("! {error}"));
    }

    let message = view.status_message.as_deref().unwrap_or_default();
    match view.phase {
        Phase::Idle => {
            if view.input_error.is_none() && view.can_submit {
                lines.push(format!("Input: {} (type :go to submit)", view.input));
            }
        }
        Phase::Submitting => match view.submitted_url.as_deref() {
            Some(url) => lines.push(format!("{message} ({url})")),
            None => lines.push(message.to_string()),
        },
        Phase::Polling => {
            let job = view.job_id.as_deref().unwrap_or("?");
            if view.checks == 0 {
                lines.push(format!("{message} (job {job})"));
            } else {
                lines.push(format!("{message} (job {job}, check {})", view.checks));
            }
        }
        Phase::Complete => lines.extend(result_card(message, view.result_url.as_deref())),
        Phase::Failed | Phase::ConnectionError => lines.push(format!("x {message}")),
    }
    lines
}

fn result_card(message: &str, url: Option<&str>) -> Vec<String> {
    let link = match url {
        Some(url) if !url.is_empty() => url,
        _ => "(the service did not return a link)",
    };
    let width = message.len().max(link.len()) + 2;
    let rule = "-".repeat(width);
    vec![
        format!("+{rule}+"),
        format!("| {message:<w$} |", w = width - 2),
        format!("| {link:<w$} |", w = width - 2),
        format!("+{rule}+"),
        "Type :copy to copy the link, or enter another URL.".to_string(),
    ]
}

pub fn examples() -> Vec<String> {
    let mut lines = vec!["Or try one of these sites:".to_string()];
    lines.extend(
        EXAMPLE_URLS
            .iter()
            .enumerate()
            .map(|(i, url)| format!("  :example {}  {}", i + 1, url)),
    );
    lines
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use reportwatch_core::{messages, update, AppState, JobStatus, Msg};

    use super::*;

    fn polling_view(status: Option<JobStatus>) -> AppViewModel {
        let (state, _) = update(AppState::new(), Msg::InputChanged("https://example.com".into()));
        let (state, _) = update(state, Msg::UrlSubmitted);
        let (state, _) = update(state, Msg::SubmitAccepted { job_id: "abc".into() });
        let state = match status {
            Some(status) => {
                update(
                    state,
                    Msg::StatusObserved {
                        job_id: "abc".into(),
                        status,
                        result: "https://reports.example/abc".into(),
                    },
                )
                .0
            }
            None => state,
        };
        state.view()
    }

    #[test]
    fn polling_line_carries_phase_message_and_check_count() {
        assert_eq!(
            render(&polling_view(None)),
            vec![format!("{} (job abc)", messages::QUEUED)]
        );
        assert_eq!(
            render(&polling_view(Some(JobStatus::GeneratingText))),
            vec![format!("{} (job abc, check 1)", messages::GENERATING_TEXT)]
        );
    }

    #[test]
    fn submitting_line_names_the_site() {
        let (state, _) = update(AppState::new(), Msg::InputChanged(" https://example.com ".into()));
        let (state, _) = update(state, Msg::UrlSubmitted);
        assert_eq!(
            render(&state.view()),
            vec![format!("{} (https://example.com)", messages::SUBMITTING)]
        );
    }

    #[test]
    fn blank_idle_input_has_no_prompt() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("   ".into()));
        assert!(render(&state.view()).is_empty());
    }

    #[test]
    fn complete_renders_result_card() {
        let lines = render(&polling_view(Some(JobStatus::Complete)));
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains(messages::COMPLETE));
        assert!(lines[2].contains("https://reports.example/abc"));
        assert_eq!(lines[0].len(), lines[1].len());
        assert_eq!(lines[2].len(), lines[3].len());
    }

    #[test]
    fn connection_error_is_one_line() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("https://example.com".into()));
        let (state, _) = update(state, Msg::UrlSubmitted);
        let (state, _) = update(state, Msg::SubmitFailed { reason: "http status 500".into() });
        assert_eq!(
            render(&state.view()),
            vec![format!("x {}", messages::CONNECTION_ERROR)]
        );
    }

    #[test]
    fn idle_input_prompts_for_go() {
        let (state, _) = update(AppState::new(), Msg::ExampleSelected(0));
        assert_eq!(
            render(&state.view()),
            vec!["Input: https://www.nytimes.com (type :go to submit)".to_string()]
        );
    }

    #[test]
    fn examples_are_numbered_from_one() {
        let lines = examples();
        assert_eq!(lines.len(), EXAMPLE_URLS.len() + 1);
        assert_eq!(lines[1], "  :example 1  https://www.nytimes.com");
    }
}
