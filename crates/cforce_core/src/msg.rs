use crate::{ExportOutcome, Page, PipelineFailure, PipelineKind, PipelineResult, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User switched the active page.
    PageSelected(Page),
    /// User edited the target input box.
    TargetChanged(String),
    /// User submitted the target for the active page's pipeline.
    RunSubmitted,
    /// Synthetic progress tick from the run's ramp timer.
    ProgressTick {
        kind: PipelineKind,
        run_id: RunId,
        increment: u8,
    },
    /// Engine finished a run with a parsed result.
    PipelineSucceeded { run_id: RunId, result: PipelineResult },
    /// Engine finished a run without a usable result.
    PipelineFailed {
        kind: PipelineKind,
        run_id: RunId,
        failure: PipelineFailure,
    },
    /// Fixed delay after a run settled has elapsed.
    RunSettled { kind: PipelineKind, run_id: RunId },
    /// User edited the chat input box.
    ChatInputChanged(String),
    /// User sent the chat input to the assistant.
    ChatSubmitted,
    /// Assistant pipeline answered; `fallback` marks the fixed failure reply.
    AssistantReplied { reply: String, fallback: bool },
    /// User asked for the active page's report on disk.
    ExportClicked,
    /// Export adapter finished.
    ExportFinished(ExportOutcome),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
