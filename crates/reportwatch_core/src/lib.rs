//! Reportwatch core: pure polling state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, ErrorKind, JobId, SessionState};
pub use status::{messages, JobStatus};
pub use update::update;
pub use view_model::{AppViewModel, Phase, EXAMPLE_URLS};
