use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use chrono::Local;
use reportwatch_core::{messages, update, AppState, Msg, Phase};
use reportwatch_logging::{watch_debug, watch_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::input::{self, Command};
use super::render;
use super::ShellEvent;

/// Runs the shell until the user quits or, with `one_shot`, until that job ends.
/// Returns the phase the session finished in.
pub fn run(config: &AppConfig, one_shot: Option<String>) -> anyhow::Result<Phase> {
    let (tx, rx) = mpsc::channel::<ShellEvent>();
    let runner =
        EffectRunner::new(&config.client_settings(), tx.clone()).context("starting report engine")?;
    let mut out = io::stdout();
    let mut shell = Shell {
        state: AppState::new(),
        runner,
    };

    let follow_one_job = one_shot.is_some();
    match one_shot {
        Some(url) => {
            shell.dispatch(vec![Msg::InputChanged(url), Msg::UrlSubmitted], &mut out)?;
            if !shell.state.session().is_busy() {
                return Ok(shell.state.view().phase);
            }
        }
        None => {
            print_lines(&mut out, &["SEO report generator".to_string()])?;
            print_lines(&mut out, &input::HELP.iter().map(|s| s.to_string()).collect::<Vec<_>>())?;
            print_lines(&mut out, &render::examples())?;
            spawn_stdin_reader(tx.clone()).context("starting input reader")?;
        }
    }
    drop(tx);

    while let Ok(event) = rx.recv() {
        let msgs = match event {
            ShellEvent::Msg(msg) => vec![msg],
            ShellEvent::Command(command) => {
                if let Some(notice) = busy_notice(&shell.state, &command) {
                    print_lines(&mut out, &[notice.to_string()])?;
                    continue;
                }
                match command.clone().into_msgs() {
                    Some(msgs) => msgs,
                    None => {
                        print_lines(&mut out, &shell_only(&command))?;
                        continue;
                    }
                }
            }
            ShellEvent::InputClosed => vec![Msg::ShutdownRequested],
        };

        if shell.dispatch(msgs, &mut out)? {
            break;
        }
        if follow_one_job && shell.state.session().is_terminal() {
            break;
        }
    }

    let phase = shell.state.view().phase;
    watch_debug!("Shell finished in phase {:?}", phase);
    Ok(phase)
}

struct Shell {
    state: AppState,
    runner: EffectRunner,
}

impl Shell {
    /// Applies messages in order, runs their effects and renders once if
    /// anything changed. Returns `true` when the shell should exit.
    fn dispatch(&mut self, msgs: Vec<Msg>, out: &mut impl Write) -> io::Result<bool> {
        let mut quit = false;
        for msg in msgs {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            quit |= self.runner.run(effects, out)?;
        }
        if quit {
            return Ok(true);
        }

        if self.state.consume_dirty() {
            print_lines(out, &render::render(&self.state.view()))?;
        }
        Ok(false)
    }
}

/// Commands that would start or edit a job are refused while one is in flight.
fn busy_notice(state: &AppState, command: &Command) -> Option<&'static str> {
    let starts_job = matches!(
        command,
        Command::Submit(_) | Command::Example(_) | Command::Go
    );
    (starts_job && state.session().is_busy()).then_some(messages::ALREADY_RUNNING)
}

fn shell_only(command: &Command) -> Vec<String> {
    match command {
        Command::Help => input::HELP.iter().map(|line| line.to_string()).collect(),
        Command::ListExamples => render::examples(),
        Command::Unknown(text) => vec![format!("Unknown command '{text}'. Type :help.")],
        _ => Vec::new(),
    }
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let stamp = Local::now().format("%H:%M:%S");
    for line in lines {
        writeln!(out, "[{stamp}] {line}")?;
    }
    out.flush()
}

fn spawn_stdin_reader(tx: mpsc::Sender<ShellEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("reportwatch-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(ShellEvent::Command(input::parse_line(&line))).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        watch_warn!("Failed to read input: {}", err);
                        break;
                    }
                }
            }
            let _ = tx.send(ShellEvent::InputClosed);
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_only_commands_print_help_and_examples() {
        assert_eq!(shell_only(&Command::Help).len(), input::HELP.len());
        assert_eq!(shell_only(&Command::ListExamples), render::examples());
        assert_eq!(
            shell_only(&Command::Unknown(":x".into())),
            vec!["Unknown command ':x'. Type :help.".to_string()]
        );
    }

    #[test]
    fn job_commands_are_refused_while_busy() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("https://example.com".into()));
        assert_eq!(busy_notice(&state, &Command::Go), None);

        let (state, _) = update(state, Msg::UrlSubmitted);
        for command in [
            Command::Submit("https://other.example".into()),
            Command::Example(2),
            Command::Go,
        ] {
            assert_eq!(
                busy_notice(&state, &command),
                Some(messages::ALREADY_RUNNING)
            );
        }
        assert_eq!(busy_notice(&state, &Command::Quit), None);
        assert_eq!(busy_notice(&state, &Command::Help), None);

        let (state, _) = update(state, Msg::SubmitAccepted { job_id: "abc".into() });
        assert_eq!(
            busy_notice(&state, &Command::Go),
            Some(messages::ALREADY_RUNNING)
        );
    }

    #[test]
    fn printed_lines_are_timestamped() {
        let mut buf = Vec::new();
        print_lines(&mut buf, &["one".to_string(), "two".to_string()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('[') && lines[0].ends_with("] one"));
        assert!(lines[1].ends_with("] two"));
    }
}
