use reportwatch_core::Msg;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A bare URL: fill the input and submit it.
    Submit(String),
    /// `:example N`, 1-based.
    Example(usize),
    Go,
    Copy,
    ListExamples,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl Command {
    /// Messages for the state machine, or `None` for shell-only commands.
    pub fn into_msgs(self) -> Option<Vec<Msg>> {
        match self {
            Command::Submit(url) => Some(vec![Msg::InputChanged(url), Msg::UrlSubmitted]),
            Command::Example(n) => Some(vec![Msg::ExampleSelected(n.saturating_sub(1))]),
            Command::Go => Some(vec![Msg::UrlSubmitted]),
            Command::Copy => Some(vec![Msg::CopyResultClicked]),
            Command::Quit => Some(vec![Msg::ShutdownRequested]),
            Command::Empty => Some(Vec::new()),
            Command::ListExamples | Command::Help | Command::Unknown(_) => None,
        }
    }
}

pub fn parse_line(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Submit(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("example" | "e"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Example(n),
            _ => Command::Unknown(line.to_string()),
        },
        (Some("examples"), None) => Command::ListExamples,
        (Some("go"), None) => Command::Go,
        (Some("copy" | "c"), None) => Command::Copy,
        (Some("help" | "h"), None) => Command::Help,
        (Some("quit" | "q"), None) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

pub const HELP: &[&str] = &[
    "Type a URL and press Enter to generate a report.",
    "  :examples     list example sites",
    "  :example N    put example N in the input",
    "  :go           submit the current input",
    "  :copy         copy the finished report link",
    "  :quit         exit",
];
