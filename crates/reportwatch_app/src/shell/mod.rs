mod app;
pub mod config;
mod effects;
mod input;
mod render;

pub use app::run;

use reportwatch_core::Msg;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub(crate) enum ShellEvent {
    /// Message from the engine, already mapped for the state machine.
    Msg(Msg),
    /// Line typed by the user.
    Command(input::Command),
    /// Standard input was closed.
    InputClosed,
}
