use std::sync::{mpsc, Arc};
use std::time::Duration;

use cforce_core::{PipelineKind, RunId};
use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::EngineEvent;

pub const RAMP_INTERVAL: Duration = Duration::from_millis(800);
/// Each tick advances progress by a uniform value in `1..=MAX_INCREMENT`.
pub const MAX_INCREMENT: u8 = 20;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Cosmetic progress timer for one run.
///
/// Ticks until the guard is dropped. Dropping cancels the task before the
/// next tick can be emitted, so no tick follows the run's completion event
/// when the guard is dropped first.
pub struct ProgressRamp {
    cancel: CancellationToken,
}

impl ProgressRamp {
    /// Must be called from within a tokio runtime.
    pub fn start(
        kind: PipelineKind,
        run_id: RunId,
        interval: Duration,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick of a tokio interval fires immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let increment = rand::thread_rng().gen_range(1..=MAX_INCREMENT);
                        sink.emit(EngineEvent::Progress { kind, run_id, increment });
                    }
                }
            }
        });
        Self { cancel }
    }
}

impl Drop for ProgressRamp {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
