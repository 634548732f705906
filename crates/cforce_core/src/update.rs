use crate::{
    AppState, Effect, ExportOutcome, LogSeverity, Msg, PipelineFailure, PipelineKind,
};

const ENGINE_FATAL: &str = "ENGINE_FATAL: Isolated request failed at core. Check API Key or Network.";
const CHAT_CORE_ERROR: &str = "CHAT_CORE_ERROR: Assistant link failed, fallback reply shown.";
const EXPORT_ERROR: &str = "Export Error: Critical failure during rendering.";

/// Pure update function: applies a message to state and returns any effects.
///
/// Never fails: every error path ends in a log entry and a settled state.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageSelected(page) => {
            state.set_page(page);
            Vec::new()
        }
        Msg::TargetChanged(text) => {
            state.set_target_input(text);
            Vec::new()
        }
        Msg::RunSubmitted => {
            let Some(kind) = state.page().pipeline_kind() else {
                return (state, Vec::new());
            };
            let target = state.target_input().trim().to_string();
            // One in-flight run per kind; a second submit waits for nothing and changes nothing.
            if target.is_empty() || state.slot(kind).run_state().is_running() {
                return (state, Vec::new());
            }
            let run_id = state.begin_run(kind, &target);
            for (message, severity) in init_lines(kind, &target) {
                state.log(message, severity);
            }
            vec![Effect::RunPipeline {
                kind,
                run_id,
                target,
            }]
        }
        Msg::ProgressTick {
            kind,
            run_id,
            increment,
        } => {
            state.advance_progress(kind, run_id, increment);
            Vec::new()
        }
        Msg::PipelineSucceeded { run_id, result } => {
            let kind = result.kind();
            if state.complete_run(run_id, result) {
                state.log(success_line(kind), LogSeverity::Success);
            }
            Vec::new()
        }
        Msg::PipelineFailed {
            kind,
            run_id,
            failure,
        } => {
            if state.fail_run(kind, run_id, failure) {
                state.log(failure_line(kind, failure), LogSeverity::Error);
            }
            Vec::new()
        }
        Msg::RunSettled { kind, run_id } => {
            state.reset_progress(kind, run_id);
            Vec::new()
        }
        Msg::ChatInputChanged(text) => {
            state.set_chat_input(text);
            Vec::new()
        }
        Msg::ChatSubmitted => {
            let query = state.chat_input().trim().to_string();
            if query.is_empty() || state.assistant_pending() {
                return (state, Vec::new());
            }
            let context = state.context_snapshot();
            let history = state.begin_chat(&query);
            vec![Effect::AskAssistant {
                query,
                history,
                context,
            }]
        }
        Msg::AssistantReplied { reply, fallback } => {
            if state.finish_chat(reply) && fallback {
                state.log(CHAT_CORE_ERROR, LogSeverity::Error);
            }
            Vec::new()
        }
        Msg::ExportClicked => export_active_page(&mut state),
        Msg::ExportFinished(outcome) => {
            if state.export_pending() {
                state.set_export_pending(false);
                match outcome {
                    ExportOutcome::Written { file_name } => {
                        state.log(format!("REPORT_EXPORTED: {file_name}"), LogSeverity::Success);
                    }
                    ExportOutcome::Failed => state.log(EXPORT_ERROR, LogSeverity::Error),
                }
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn export_active_page(state: &mut AppState) -> Vec<Effect> {
    let Some(kind) = state.page().pipeline_kind() else {
        return Vec::new();
    };
    if state.export_pending() {
        return Vec::new();
    }
    let slot = state.slot(kind);
    let (Some(result), Some(target)) = (slot.result().cloned(), slot.target().map(str::to_string))
    else {
        return Vec::new();
    };
    state.set_export_pending(true);
    state.log("Rendering report fragments...", LogSeverity::Info);
    vec![Effect::ExportReport {
        kind,
        target,
        result,
    }]
}

fn init_lines(kind: PipelineKind, target: &str) -> Vec<(String, LogSeverity)> {
    match kind {
        PipelineKind::Scan => vec![
            (
                format!("SCANNER_INIT: Starting Comprehensive Vulnerability Intelligence Scan for {target}"),
                LogSeverity::Warning,
            ),
            (
                "Analyzing Technical Profile & TLS Config...".to_string(),
                LogSeverity::Info,
            ),
        ],
        PipelineKind::Osint => vec![(
            format!("OSINT_INIT: Harvesting Domain Identity Data for {target}"),
            LogSeverity::Info,
        )],
        PipelineKind::IpTrace => vec![(
            format!("IP_TRACE_INIT: Mapping Full Internet IP Ranges for {target}"),
            LogSeverity::Warning,
        )],
    }
}

fn success_line(kind: PipelineKind) -> &'static str {
    match kind {
        PipelineKind::Scan => "SCAN_COMPLETE: Full Security & Vulnerability Report Generated.",
        PipelineKind::Osint => "OSINT_SUCCESS: Identity Map compiled.",
        PipelineKind::IpTrace => {
            "IP_TRACE_SUCCESS: Comprehensive Network Intelligence Report compiled."
        }
    }
}

fn failure_line(kind: PipelineKind, failure: PipelineFailure) -> String {
    match failure {
        PipelineFailure::Engine => ENGINE_FATAL.to_string(),
        PipelineFailure::Parse => {
            format!("PARSE_FAILURE: {kind} engine returned malformed intelligence data.")
        }
    }
}
