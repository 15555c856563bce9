//! Reportwatch engine: HTTP client for the report service and the poll loop.
mod client;
mod engine;
mod poller;
mod types;

pub use client::{ClientSettings, ReportService, ReqwestReportClient, DEFAULT_BASE_URL};
pub use engine::{EngineError, EngineHandle};
pub use poller::{ChannelEventSink, EventSink, PollSession, MAX_POLL_INTERVAL};
pub use types::{
    ClientError, EngineEvent, FailureKind, JobId, RemoteStatus, StatusReport, SubmitRequest,
    SubmitResponse,
};
