use crate::{ChatMessage, LogEntry, Page, PipelineKind, PipelineResult, RunState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub page: Page,
    pub target_input: String,
    pub chat_input: String,
    /// One row per kind, in `PipelineKind::ALL` order.
    pub pipelines: Vec<PipelineRowView>,
    pub logs: Vec<LogEntry>,
    pub chat: Vec<ChatMessage>,
    /// Any pipeline is running.
    pub busy: bool,
    pub assistant_pending: bool,
    pub export_pending: bool,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn pipeline(&self, kind: PipelineKind) -> Option<&PipelineRowView> {
        self.pipelines.iter().find(|row| row.kind == kind)
    }

    /// Row for the pipeline behind the active page, if it has one.
    pub fn active_pipeline(&self) -> Option<&PipelineRowView> {
        self.page.pipeline_kind().and_then(|kind| self.pipeline(kind))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRowView {
    pub kind: PipelineKind,
    pub run_state: RunState,
    pub target: Option<String>,
    pub progress: u8,
    pub result: Option<PipelineResult>,
    pub can_export: bool,
}
