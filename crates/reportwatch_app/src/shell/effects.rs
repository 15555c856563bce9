use std::io::{self, Write};
use std::sync::{mpsc, Arc};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reportwatch_core::{Effect, JobStatus, Msg};
use reportwatch_engine::{
    ClientSettings, EngineError, EngineEvent, EngineHandle, EventSink, RemoteStatus,
};
use reportwatch_logging::{watch_debug, watch_info, watch_warn};

use super::ShellEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: &ClientSettings, tx: mpsc::Sender<ShellEvent>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { tx }))?;
        Ok(Self { engine })
    }

    /// Executes effects in order. Returns `true` once a quit was requested.
    pub fn run(&self, effects: Vec<Effect>, out: &mut impl Write) -> io::Result<bool> {
        let mut quit = false;
        for effect in effects {
            match effect {
                Effect::SubmitUrl { url } => {
                    watch_info!("SubmitUrl url_len={} url={}", url.len(), url);
                    self.engine.submit(url);
                }
                Effect::StartPolling { job_id } => self.engine.start_polling(job_id),
                Effect::StopPolling => self.engine.stop_polling(),
                Effect::CopyToClipboard { text } => {
                    out.write_all(osc52_copy(&text).as_bytes())?;
                    writeln!(out, "Copied {text}")?;
                    out.flush()?;
                }
                Effect::Quit => quit = true,
            }
        }
        Ok(quit)
    }
}

struct MsgSink {
    tx: mpsc::Sender<ShellEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        if let Some(msg) = map_event(event) {
            let _ = self.tx.send(ShellEvent::Msg(msg));
        }
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::SubmitCompleted { result: Ok(job_id) } => Some(Msg::SubmitAccepted { job_id }),
        EngineEvent::SubmitCompleted { result: Err(err) } => {
            watch_warn!("Submit failed: {}", err);
            Some(Msg::SubmitFailed {
                reason: err.to_string(),
            })
        }
        EngineEvent::StatusChecked {
            job_id,
            result: Ok(report),
        } => Some(Msg::StatusObserved {
            job_id,
            status: map_status(report.remote_status()),
            result: report.result,
        }),
        EngineEvent::StatusChecked {
            job_id,
            result: Err(err),
        } => Some(Msg::PollFailed {
            job_id,
            reason: err.to_string(),
        }),
        EngineEvent::PollingStopped { job_id } => {
            watch_debug!("Poll loop ended job_id={}", job_id);
            None
        }
    }
}

fn map_status(status: RemoteStatus) -> JobStatus {
    match status {
        RemoteStatus::FetchingData => JobStatus::FetchingData,
        RemoteStatus::GeneratingText => JobStatus::GeneratingText,
        RemoteStatus::CreatingPresentation => JobStatus::CreatingPresentation,
        RemoteStatus::Complete => JobStatus::Complete,
        RemoteStatus::Failed => JobStatus::Failed,
        RemoteStatus::Unrecognized => JobStatus::Queued,
    }
}

/// Terminal clipboard escape (OSC 52); terminals without support ignore it.
fn osc52_copy(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
