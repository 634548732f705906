use crate::{ChatMessage, ContextSnapshot, PipelineKind, PipelineResult, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run one pipeline for `target`; completion comes back tagged with `run_id`.
    RunPipeline {
        kind: PipelineKind,
        run_id: RunId,
        target: String,
    },
    /// Ask the assistant; `history` excludes the turn carrying `query`.
    AskAssistant {
        query: String,
        history: Vec<ChatMessage>,
        context: ContextSnapshot,
    },
    /// Write the given result to a report document.
    ExportReport {
        kind: PipelineKind,
        target: String,
        result: PipelineResult,
    },
}
