mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use cforce_core::report::ScanReport;
use cforce_core::{ChatMessage, ContextSnapshot, PipelineKind, PipelineResult};
use cforce_engine::{EngineConfig, EngineEvent, EngineHandle, FALLBACK_REPLY};
use support::ScriptedGateway;
use tempfile::TempDir;

fn fast_config(output_dir: &std::path::Path) -> EngineConfig {
    EngineConfig {
        ramp_interval: Duration::from_millis(5),
        settle_delay: Duration::from_millis(20),
        ..EngineConfig::default_with_output(output_dir)
    }
}

fn collect_until<F>(engine: &EngineHandle, mut done: F) -> Vec<EngineEvent>
where
    F: FnMut(&EngineEvent) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while Instant::now() < deadline {
        match engine.try_recv() {
            Some(event) => {
                let finished = done(&event);
                events.push(event);
                if finished {
                    return events;
                }
            }
            None => std::thread::sleep(Duration::from_millis(2)),
        }
    }
    panic!("engine did not finish in time: {events:?}");
}

#[test]
fn run_completes_then_settles_without_trailing_ticks() {
    let temp = TempDir::new().unwrap();
    let gateway = Arc::new(ScriptedGateway::ok(r#"{"target":"example.com","status":"STABLE"}"#));
    let engine = EngineHandle::new(fast_config(temp.path()), gateway).unwrap();

    engine.run_pipeline(PipelineKind::Scan, 3, "example.com");
    let events = collect_until(&engine, |event| matches!(event, EngineEvent::RunSettled { .. }));

    let completed_at = events
        .iter()
        .position(|event| matches!(event, EngineEvent::PipelineCompleted { .. }))
        .expect("completion event");
    assert_eq!(completed_at, events.len() - 2);
    match &events[completed_at] {
        EngineEvent::PipelineCompleted {
            kind,
            run_id,
            result: Ok(PipelineResult::Scan(_)),
        } => {
            assert_eq!(*kind, PipelineKind::Scan);
            assert_eq!(*run_id, 3);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        events.last(),
        Some(&EngineEvent::RunSettled {
            kind: PipelineKind::Scan,
            run_id: 3
        })
    );
}

#[test]
fn failed_run_still_settles() {
    let temp = TempDir::new().unwrap();
    let engine =
        EngineHandle::new(fast_config(temp.path()), Arc::new(ScriptedGateway::ok("I cannot comply")))
            .unwrap();

    engine.run_pipeline(PipelineKind::IpTrace, 1, "Palestine");
    let events = collect_until(&engine, |event| matches!(event, EngineEvent::RunSettled { .. }));

    let failure = events.iter().find_map(|event| match event {
        EngineEvent::PipelineCompleted { result: Err(err), .. } => Some(err.clone()),
        _ => None,
    });
    assert!(failure.expect("failure event").is_parse());
}

#[test]
fn ask_reports_fallback_on_gateway_failure() {
    let temp = TempDir::new().unwrap();
    let engine =
        EngineHandle::new(fast_config(temp.path()), Arc::new(ScriptedGateway::failing())).unwrap();

    engine.ask("hi", vec![ChatMessage::user("earlier")], ContextSnapshot::NoContext);
    let events = collect_until(&engine, |event| matches!(event, EngineEvent::AssistantReplied(_)));

    match events.last() {
        Some(EngineEvent::AssistantReplied(reply)) => {
            assert!(reply.fallback);
            assert_eq!(reply.text, FALLBACK_REPLY);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn export_writes_report_into_output_dir() {
    let temp = TempDir::new().unwrap();
    let engine =
        EngineHandle::new(fast_config(temp.path()), Arc::new(ScriptedGateway::default())).unwrap();

    engine.export(
        PipelineKind::Scan,
        "example.com",
        PipelineResult::Scan(ScanReport::default()),
    );
    let events = collect_until(&engine, |event| matches!(event, EngineEvent::ExportCompleted { .. }));

    match events.last() {
        Some(EngineEvent::ExportCompleted { result: Ok(path) }) => {
            assert_eq!(path, &temp.path().join("C-FORCE_REPORT_example_com.md"));
            assert!(path.is_file());
        }
        other => panic!("unexpected {other:?}"),
    }
}
