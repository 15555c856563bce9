use std::sync::{mpsc, Arc};
use std::time::Duration;

use reportwatch_logging::{watch_debug, watch_info, watch_warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, JobId, RemoteStatus, ReportService};

/// Longest period a poll loop will wait between checks.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

struct ActivePoll {
    job_id: JobId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns the single poll loop of the client.
///
/// At most one loop runs at a time: `start` stops the previous one before
/// spawning. A loop ends on its own after a terminal status or a failed
/// check, and is cancelled by `stop` or when the session is dropped.
///
/// Checks never overlap. The next tick is only awaited once the current
/// request has returned; late ticks are delayed rather than bunched up.
pub struct PollSession {
    runtime: Handle,
    service: Arc<dyn ReportService>,
    sink: Arc<dyn EventSink>,
    interval: Duration,
    active: Option<ActivePoll>,
}

impl PollSession {
    pub fn new(
        runtime: Handle,
        service: Arc<dyn ReportService>,
        sink: Arc<dyn EventSink>,
        interval: Duration,
    ) -> Self {
        Self {
            runtime,
            service,
            sink,
            interval,
            active: None,
        }
    }

    pub fn start(&mut self, job_id: impl Into<JobId>) {
        self.stop();

        let job_id = job_id.into();
        let cancel = CancellationToken::new();
        watch_info!(
            "Polling job_id={} every {}ms",
            job_id,
            self.interval.as_millis()
        );
        let task = self.runtime.spawn(poll_loop(
            job_id.clone(),
            self.service.clone(),
            self.sink.clone(),
            self.interval,
            cancel.clone(),
        ));
        self.active = Some(ActivePoll {
            job_id,
            cancel,
            task,
        });
    }

    /// Cancels the running loop. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                let was_running = !active.task.is_finished();
                active.cancel.cancel();
                if was_running {
                    watch_debug!("Stopped polling job_id={}", active.job_id);
                }
                was_running
            }
            None => false,
        }
    }

    /// Job id of the loop that is still running, if any.
    pub fn active_job(&self) -> Option<&str> {
        self.active
            .as_ref()
            .filter(|active| !active.task.is_finished())
            .map(|active| active.job_id.as_str())
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    job_id: JobId,
    service: Arc<dyn ReportService>,
    sink: Arc<dyn EventSink>,
    period: Duration,
    cancel: CancellationToken,
) {
    // tokio intervals panic on a zero period, and the first deadline must fit in an Instant.
    let period = period.clamp(Duration::from_millis(1), MAX_POLL_INTERVAL);
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tick += 1;

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = service.status(&job_id) => result,
        };

        let finished = match &result {
            Ok(report) => {
                let status = report.remote_status();
                if status == RemoteStatus::Unrecognized {
                    watch_debug!(
                        "job_id={} tick={} unrecognized status '{}'",
                        job_id,
                        tick,
                        report.status
                    );
                } else {
                    watch_debug!("job_id={} tick={} status={}", job_id, tick, report.status);
                }
                status.is_terminal()
            }
            Err(err) => {
                watch_warn!("job_id={} tick={} status check failed: {}", job_id, tick, err);
                true
            }
        };

        sink.emit(EngineEvent::StatusChecked {
            job_id: job_id.clone(),
            result,
        });
        if finished {
            break;
        }
    }

    sink.emit(EngineEvent::PollingStopped { job_id });
}
