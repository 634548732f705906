use cforce_core::report::{IpTraceReport, OsintReport, ScanReport};
use cforce_core::{
    update, AppState, ChatMessage, ChatRole, ContextSnapshot, Effect, LogSeverity, Msg, Page,
    PipelineResult, RunId, LOG_CAPACITY,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    cforce_logging::initialize_for_tests();
}

fn run_to_success(state: AppState, page: Page, result: PipelineResult) -> AppState {
    let (state, _) = update(state, Msg::PageSelected(page));
    let (state, _) = update(state, Msg::TargetChanged("example.com".to_string()));
    let (state, effects) = update(state, Msg::RunSubmitted);
    let run_id: RunId = match effects.as_slice() {
        [Effect::RunPipeline { run_id, .. }] => *run_id,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(state, Msg::PipelineSucceeded { run_id, result });
    state
}

fn ask(state: AppState, query: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::PageSelected(Page::Assistant));
    let (state, _) = update(state, Msg::ChatInputChanged(query.to_string()));
    update(state, Msg::ChatSubmitted)
}

fn context_of(effects: &[Effect]) -> ContextSnapshot {
    match effects {
        [Effect::AskAssistant { context, .. }] => context.clone(),
        other => panic!("unexpected effects {other:?}"),
    }
}

fn scan_result() -> PipelineResult {
    PipelineResult::Scan(ScanReport {
        status: Some("STABLE".into()),
        ..ScanReport::default()
    })
}

fn osint_result() -> PipelineResult {
    PipelineResult::Osint(OsintReport {
        executive_summary: Some("public footprint".into()),
        ..OsintReport::default()
    })
}

fn ip_trace_result() -> PipelineResult {
    PipelineResult::IpTrace(IpTraceReport {
        all_country_ip_ranges: Some(vec!["1.2.3.0/24".into()]),
        ..IpTraceReport::default()
    })
}

#[test]
fn context_prefers_scan_over_osint_and_ip_trace() {
    init_logging();
    let state = run_to_success(AppState::new(), Page::IpExplorer, ip_trace_result());
    let state = run_to_success(state, Page::Osint, osint_result());
    let state = run_to_success(state, Page::Scanner, scan_result());

    let (_, effects) = ask(state, "what is exposed?");

    assert_eq!(context_of(&effects), ContextSnapshot::Report(scan_result()));
}

#[test]
fn context_falls_back_to_osint_then_ip_trace() {
    init_logging();
    let state = run_to_success(AppState::new(), Page::IpExplorer, ip_trace_result());
    assert_eq!(
        state.context_snapshot(),
        ContextSnapshot::Report(ip_trace_result())
    );

    let state = run_to_success(state, Page::Osint, osint_result());
    let (_, effects) = ask(state, "summarize");

    assert_eq!(context_of(&effects), ContextSnapshot::Report(osint_result()));
}

#[test]
fn context_is_no_context_without_results() {
    init_logging();
    let (_, effects) = ask(AppState::new(), "hello");

    assert_eq!(context_of(&effects), ContextSnapshot::NoContext);
}

#[test]
fn chat_appends_user_turn_before_dispatch_and_one_reply_after() {
    init_logging();
    let (state, effects) = ask(AppState::new(), "  explain CVE-2021-44228  ");

    assert_eq!(state.chat(), &[ChatMessage::user("explain CVE-2021-44228")]);
    assert!(state.assistant_pending());
    assert_eq!(state.chat_input(), "");
    match effects.as_slice() {
        [Effect::AskAssistant { query, history, .. }] => {
            assert_eq!(query, "explain CVE-2021-44228");
            assert!(history.is_empty());
        }
        other => panic!("unexpected effects {other:?}"),
    }

    let (state, _) = update(
        state,
        Msg::AssistantReplied {
            reply: "Patch log4j.".to_string(),
            fallback: false,
        },
    );
    assert_eq!(state.chat().len(), 2);
    assert_eq!(state.chat()[1].role, ChatRole::Assistant);
    assert!(!state.assistant_pending());

    let (state, effects) = ask(state, "and then?");
    match effects.as_slice() {
        [Effect::AskAssistant { history, .. }] => assert_eq!(history.len(), 2),
        other => panic!("unexpected effects {other:?}"),
    }
    let (state, _) = update(
        state,
        Msg::AssistantReplied {
            reply: "Rotate keys.".to_string(),
            fallback: false,
        },
    );
    let roles: Vec<_> = state.chat().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![ChatRole::User, ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]
    );
}

#[test]
fn fallback_reply_is_appended_and_logged() {
    init_logging();
    let (state, _) = ask(AppState::new(), "hi");
    let (state, _) = update(
        state,
        Msg::AssistantReplied {
            reply: "CORE_CHAT_ERROR: Could not establish secure AI connection.".to_string(),
            fallback: true,
        },
    );

    assert_eq!(state.chat().len(), 2);
    let errors = state
        .log_entries()
        .filter(|entry| entry.severity == LogSeverity::Error)
        .count();
    assert_eq!(errors, 1);
}

#[test]
fn chat_submit_while_pending_is_ignored() {
    init_logging();
    let (state, _) = ask(AppState::new(), "first");
    let (state, effects) = ask(state, "second");

    assert!(effects.is_empty());
    assert_eq!(state.chat().len(), 1);
}

#[test]
fn unsolicited_reply_is_dropped() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::AssistantReplied {
            reply: "stray".to_string(),
            fallback: false,
        },
    );

    assert!(state.chat().is_empty());
}

#[test]
fn log_keeps_only_most_recent_entries() {
    init_logging();
    let mut state = AppState::new();
    for i in 0..(LOG_CAPACITY + 10) {
        let (next, _) = ask(state, &format!("q{i}"));
        let (next, _) = update(
            next,
            Msg::AssistantReplied {
                reply: "fallback".to_string(),
                fallback: true,
            },
        );
        state = next;
    }

    assert_eq!(state.log_entries().count(), LOG_CAPACITY);
    assert_eq!(state.chat().len(), 2 * (LOG_CAPACITY + 10));
}
