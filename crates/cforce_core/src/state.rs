use crate::activity::{ActivityLog, LogEntry, LogSeverity};
use crate::chat::{ChatMessage, ContextSnapshot};
use crate::view_model::{AppViewModel, PipelineRowView};
use crate::{Page, PipelineKind, PipelineResult};

pub type RunId = u64;

/// Progress shown the moment a run starts.
pub const PROGRESS_START: u8 = 15;
/// The synthetic ramp never passes this value before the run settles.
pub const PROGRESS_CAP: u8 = 98;
pub const PROGRESS_DONE: u8 = 100;

/// Why a pipeline run failed, stripped of transport detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineFailure {
    /// Gateway could not produce model output (network, auth, quota).
    Engine,
    /// Model output was not a well-formed result object.
    Parse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed(PipelineFailure),
}

impl RunState {
    pub fn is_running(self) -> bool {
        matches!(self, RunState::Running)
    }
}

/// Per-kind slot: lifecycle of the latest run plus the last stored result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineSlot {
    run_state: RunState,
    run_id: Option<RunId>,
    target: Option<String>,
    result: Option<PipelineResult>,
    progress: u8,
}

impl PipelineSlot {
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Target of the latest run.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn result(&self) -> Option<&PipelineResult> {
        self.result.as_ref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    fn is_live(&self, run_id: RunId) -> bool {
        self.run_id == Some(run_id)
    }
}

/// Outcome of a report export as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { file_name: String },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    page: Page,
    target_input: String,
    chat_input: String,
    slots: [PipelineSlot; 3],
    log: ActivityLog,
    chat: Vec<ChatMessage>,
    assistant_pending: bool,
    export_pending: bool,
    next_run_id: RunId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            page: Page::default(),
            target_input: String::new(),
            chat_input: String::new(),
            slots: Default::default(),
            log: ActivityLog::default(),
            chat: Vec::new(),
            assistant_pending: false,
            export_pending: false,
            next_run_id: 1,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let pipelines = PipelineKind::ALL
            .iter()
            .map(|kind| self.row_view(*kind))
            .collect();
        AppViewModel {
            page: self.page,
            target_input: self.target_input.clone(),
            chat_input: self.chat_input.clone(),
            pipelines,
            logs: self.log.to_vec(),
            chat: self.chat.clone(),
            busy: self.slots.iter().any(|slot| slot.run_state.is_running()),
            assistant_pending: self.assistant_pending,
            export_pending: self.export_pending,
            dirty: self.dirty,
        }
    }

    fn row_view(&self, kind: PipelineKind) -> PipelineRowView {
        let slot = self.slot(kind);
        PipelineRowView {
            kind,
            run_state: slot.run_state,
            target: slot.target.clone(),
            progress: slot.progress,
            result: slot.result.clone(),
            can_export: slot.result.is_some() && !self.export_pending,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn target_input(&self) -> &str {
        &self.target_input
    }

    pub fn chat_input(&self) -> &str {
        &self.chat_input
    }

    pub fn slot(&self, kind: PipelineKind) -> &PipelineSlot {
        &self.slots[kind.index()]
    }

    pub fn log_entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.log.entries()
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn assistant_pending(&self) -> bool {
        self.assistant_pending
    }

    pub fn export_pending(&self) -> bool {
        self.export_pending
    }

    /// Snapshot of the result that would ground a chat query sent now.
    pub fn context_snapshot(&self) -> ContextSnapshot {
        ContextSnapshot::select(|kind| self.slot(kind).result())
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn slot_mut(&mut self, kind: PipelineKind) -> &mut PipelineSlot {
        &mut self.slots[kind.index()]
    }

    pub(crate) fn set_page(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_target_input(&mut self, text: String) {
        if self.target_input != text {
            self.target_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_chat_input(&mut self, text: String) {
        if self.chat_input != text {
            self.chat_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn log(&mut self, message: impl Into<String>, severity: LogSeverity) {
        self.log.push(message, severity);
        self.mark_dirty();
    }

    /// Clears the log and the kind's result, then marks the kind running.
    pub(crate) fn begin_run(&mut self, kind: PipelineKind, target: &str) -> RunId {
        let run_id = self.next_run_id;
        self.next_run_id += 1;
        self.log.clear();
        let slot = self.slot_mut(kind);
        slot.run_state = RunState::Running;
        slot.run_id = Some(run_id);
        slot.target = Some(target.to_string());
        slot.result = None;
        slot.progress = PROGRESS_START;
        self.mark_dirty();
        run_id
    }

    /// Advances the synthetic ramp; returns false for stale or settled runs.
    pub(crate) fn advance_progress(&mut self, kind: PipelineKind, run_id: RunId, increment: u8) -> bool {
        let slot = self.slot_mut(kind);
        if !slot.is_live(run_id) || !slot.run_state.is_running() {
            return false;
        }
        let next = slot.progress.saturating_add(increment).min(PROGRESS_CAP);
        if next <= slot.progress {
            return false;
        }
        slot.progress = next;
        self.mark_dirty();
        true
    }

    /// Settles a live run as succeeded; the result replaces the slot wholesale.
    pub(crate) fn complete_run(&mut self, run_id: RunId, result: PipelineResult) -> bool {
        let slot = self.slot_mut(result.kind());
        if !slot.is_live(run_id) || !slot.run_state.is_running() {
            return false;
        }
        slot.run_state = RunState::Succeeded;
        slot.result = Some(result);
        slot.progress = PROGRESS_DONE;
        self.mark_dirty();
        true
    }

    /// Settles a live run as failed; the result slot is left untouched.
    pub(crate) fn fail_run(&mut self, kind: PipelineKind, run_id: RunId, failure: PipelineFailure) -> bool {
        let slot = self.slot_mut(kind);
        if !slot.is_live(run_id) || !slot.run_state.is_running() {
            return false;
        }
        slot.run_state = RunState::Failed(failure);
        slot.progress = PROGRESS_DONE;
        self.mark_dirty();
        true
    }

    pub(crate) fn reset_progress(&mut self, kind: PipelineKind, run_id: RunId) {
        let slot = self.slot_mut(kind);
        if slot.is_live(run_id) && !slot.run_state.is_running() && slot.progress != 0 {
            slot.progress = 0;
            self.mark_dirty();
        }
    }

    /// Appends the user turn and returns the history preceding it.
    pub(crate) fn begin_chat(&mut self, query: &str) -> Vec<ChatMessage> {
        let history = self.chat.clone();
        self.chat.push(ChatMessage::user(query));
        self.chat_input.clear();
        self.assistant_pending = true;
        self.mark_dirty();
        history
    }

    pub(crate) fn finish_chat(&mut self, reply: String) -> bool {
        if !self.assistant_pending {
            return false;
        }
        self.chat.push(ChatMessage::assistant(reply));
        self.assistant_pending = false;
        self.mark_dirty();
        true
    }

    pub(crate) fn set_export_pending(&mut self, pending: bool) {
        if self.export_pending != pending {
            self.export_pending = pending;
            self.mark_dirty();
        }
    }
}
