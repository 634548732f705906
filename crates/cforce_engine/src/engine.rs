use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use cforce_core::{ChatMessage, ContextSnapshot, PipelineKind, PipelineResult, RunId};
use cforce_logging::{cforce_debug, cforce_error, cforce_info};
use tokio::sync::mpsc as async_mpsc;

use crate::assistant::AssistantPipeline;
use crate::export::write_report;
use crate::gateway::{GatewaySettings, GeminiGateway, ModelGateway, DEFAULT_MODEL};
use crate::pipeline::Pipeline;
use crate::ramp::{ChannelProgressSink, ProgressRamp, ProgressSink, RAMP_INTERVAL};
use crate::{EngineEvent, GatewayError};

/// Delay between a run's completion and its `RunSettled` event.
pub const SETTLE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub model: String,
    pub output_dir: PathBuf,
    pub ramp_interval: Duration,
    pub settle_delay: Duration,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            output_dir: output_dir.into(),
            ramp_interval: RAMP_INTERVAL,
            settle_delay: SETTLE_DELAY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

enum EngineCommand {
    RunPipeline {
        kind: PipelineKind,
        run_id: RunId,
        target: String,
    },
    Ask {
        query: String,
        history: Vec<ChatMessage>,
        context: ContextSnapshot,
    },
    Export {
        kind: PipelineKind,
        target: String,
        result: PipelineResult,
    },
}

/// Owns the engine thread. Commands are fire-and-forget; outcomes come back
/// through [`EngineHandle::try_recv`]. Dropping the handle stops the thread.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, gateway: Arc<dyn ModelGateway>) -> Result<Self, EngineError> {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let worker = Arc::new(Worker::new(config, gateway, event_tx));
        thread::Builder::new()
            .name("cforce-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(command) = cmd_rx.recv().await {
                        tokio::spawn(handle_command(worker.clone(), command));
                    }
                });
                cforce_debug!("engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    /// Engine talking to the Gemini REST endpoint.
    pub fn with_gemini(config: EngineConfig, settings: GatewaySettings) -> Result<Self, EngineError> {
        let gateway = Arc::new(GeminiGateway::new(settings)?);
        Self::new(config, gateway)
    }

    pub fn run_pipeline(&self, kind: PipelineKind, run_id: RunId, target: impl Into<String>) {
        self.send(EngineCommand::RunPipeline {
            kind,
            run_id,
            target: target.into(),
        });
    }

    pub fn ask(&self, query: impl Into<String>, history: Vec<ChatMessage>, context: ContextSnapshot) {
        self.send(EngineCommand::Ask {
            query: query.into(),
            history,
            context,
        });
    }

    pub fn export(&self, kind: PipelineKind, target: impl Into<String>, result: PipelineResult) {
        self.send(EngineCommand::Export {
            kind,
            target: target.into(),
            result,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            cforce_error!("engine thread is gone; command dropped");
        }
    }
}

struct Worker {
    config: EngineConfig,
    pipelines: [Pipeline; 3],
    assistant: AssistantPipeline,
    sink: Arc<dyn ProgressSink>,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl Worker {
    fn new(
        config: EngineConfig,
        gateway: Arc<dyn ModelGateway>,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Self {
        let pipelines = PipelineKind::ALL.map(|kind| Pipeline::new(kind, gateway.clone(), &config.model));
        let assistant = AssistantPipeline::new(gateway, &config.model);
        Self {
            pipelines,
            assistant,
            sink: Arc::new(ChannelProgressSink::new(event_tx.clone())),
            event_tx,
            config,
        }
    }

    fn pipeline(&self, kind: PipelineKind) -> &Pipeline {
        match kind {
            PipelineKind::Scan => &self.pipelines[0],
            PipelineKind::Osint => &self.pipelines[1],
            PipelineKind::IpTrace => &self.pipelines[2],
        }
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

async fn handle_command(worker: Arc<Worker>, command: EngineCommand) {
    match command {
        EngineCommand::RunPipeline {
            kind,
            run_id,
            target,
        } => {
            let result = {
                let _ramp =
                    ProgressRamp::start(kind, run_id, worker.config.ramp_interval, worker.sink.clone());
                worker.pipeline(kind).run(&target).await
            };
            cforce_info!("{kind} run {run_id} completed ok={}", result.is_ok());
            worker.emit(EngineEvent::PipelineCompleted {
                kind,
                run_id,
                result,
            });
            tokio::time::sleep(worker.config.settle_delay).await;
            worker.emit(EngineEvent::RunSettled { kind, run_id });
        }
        EngineCommand::Ask {
            query,
            history,
            context,
        } => {
            let reply = worker.assistant.ask(&query, &history, &context).await;
            worker.emit(EngineEvent::AssistantReplied(reply));
        }
        EngineCommand::Export {
            kind,
            target,
            result,
        } => {
            let output_dir = worker.config.output_dir.clone();
            let generated_utc = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
            let outcome = tokio::task::spawn_blocking(move || {
                write_report(&output_dir, kind, &target, &result, &generated_utc)
                    .map_err(|err| err.to_string())
            })
            .await
            .unwrap_or_else(|err| Err(err.to_string()));
            if let Err(err) = &outcome {
                cforce_error!("report export failed: {err}");
            }
            worker.emit(EngineEvent::ExportCompleted { result: outcome });
        }
    }
}
