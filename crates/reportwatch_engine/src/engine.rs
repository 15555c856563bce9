use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use reportwatch_logging::{watch_debug, watch_info};
use thiserror::Error;

use crate::client::{ClientSettings, ReportService, ReqwestReportClient};
use crate::poller::{EventSink, PollSession};
use crate::{ClientError, EngineEvent, JobId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not start engine runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("could not build report client: {0}")]
    Client(#[from] ClientError),
}

enum EngineCommand {
    Submit { url: String },
    StartPolling { job_id: JobId },
    StopPolling,
    Shutdown,
}

/// Runs report-service IO on a dedicated thread with its own tokio runtime.
///
/// Commands are queued from the caller's thread; results arrive through the
/// supplied [`EventSink`]. Dropping the handle cancels any poll loop and joins
/// the engine thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: &ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let client = ReqwestReportClient::new(settings)?;
        watch_info!("Report service at {}", client.base_url());
        Self::with_service(Arc::new(client), settings.poll_interval, sink)
    }

    pub fn with_service(
        service: Arc<dyn ReportService>,
        poll_interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("reportwatch-io")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("reportwatch-engine".to_string())
            .spawn(move || {
                let mut session = PollSession::new(
                    runtime.handle().clone(),
                    service.clone(),
                    sink.clone(),
                    poll_interval,
                );
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Submit { url } => {
                            let service = service.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                let result = service.submit(&url).await;
                                sink.emit(EngineEvent::SubmitCompleted { result });
                            });
                        }
                        EngineCommand::StartPolling { job_id } => session.start(job_id),
                        EngineCommand::StopPolling => {
                            session.stop();
                        }
                        EngineCommand::Shutdown => break,
                    }
                }
                drop(session);
                runtime.shutdown_timeout(Duration::from_secs(1));
                watch_debug!("Engine thread exited");
            })?;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    pub fn submit(&self, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { url: url.into() });
    }

    pub fn start_polling(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling {
            job_id: job_id.into(),
        });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
