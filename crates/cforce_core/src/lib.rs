//! C-Force core: pure orchestration state machine, result schemas and view-model helpers.
mod activity;
mod chat;
mod effect;
mod kind;
mod msg;
pub mod report;
mod state;
mod update;
mod view_model;

pub use activity::{ActivityLog, LogEntry, LogSeverity, LOG_CAPACITY};
pub use chat::{ChatMessage, ChatRole, ContextSnapshot, CONTEXT_PRECEDENCE};
pub use effect::Effect;
pub use kind::{Page, PipelineKind};
pub use msg::Msg;
pub use report::{PipelineResult, Severity, Text};
pub use state::{
    AppState, ExportOutcome, PipelineFailure, PipelineSlot, RunId, RunState, PROGRESS_CAP,
    PROGRESS_DONE, PROGRESS_START,
};
pub use update::update;
pub use view_model::{AppViewModel, PipelineRowView};
