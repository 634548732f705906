use std::sync::{Arc, Mutex};
use std::time::Duration;

use cforce_core::PipelineKind;
use cforce_engine::{EngineEvent, ProgressRamp, ProgressSink, MAX_INCREMENT};

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn increments(&self) -> Vec<u8> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Progress {
                    kind: PipelineKind::Osint,
                    run_id: 7,
                    increment,
                } => Some(*increment),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[tokio::test(start_paused = true)]
async fn ramp_ticks_until_guard_drops() {
    let sink = Arc::new(TestSink::default());
    let ramp = ProgressRamp::start(PipelineKind::Osint, 7, Duration::from_millis(800), sink.clone());

    tokio::time::sleep(Duration::from_millis(800 * 5 + 100)).await;
    let ticks = sink.increments();
    assert_eq!(ticks.len(), 5);
    assert!(ticks.iter().all(|inc| (1..=MAX_INCREMENT).contains(inc)));

    drop(ramp);
    tokio::time::sleep(Duration::from_millis(800 * 5)).await;
    assert_eq!(sink.increments().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn no_tick_before_first_interval() {
    let sink = Arc::new(TestSink::default());
    let _ramp = ProgressRamp::start(PipelineKind::Osint, 7, Duration::from_millis(800), sink.clone());

    tokio::time::sleep(Duration::from_millis(700)).await;

    assert!(sink.increments().is_empty());
}
