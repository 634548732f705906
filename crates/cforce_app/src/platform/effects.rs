use cforce_core::{Effect, ExportOutcome, Msg, PipelineFailure};
use cforce_engine::{EngineEvent, EngineHandle, PipelineError};
use cforce_logging::{cforce_info, cforce_warn};

/// Bridges core effects to the engine and engine events back to messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RunPipeline {
                    kind,
                    run_id,
                    target,
                } => {
                    cforce_info!("RunPipeline kind={} run_id={} target_len={}", kind, run_id, target.len());
                    self.engine.run_pipeline(kind, run_id, target);
                }
                Effect::AskAssistant {
                    query,
                    history,
                    context,
                } => {
                    cforce_info!(
                        "AskAssistant history={} grounded={}",
                        history.len(),
                        context.report().is_some()
                    );
                    self.engine.ask(query, history, context);
                }
                Effect::ExportReport {
                    kind,
                    target,
                    result,
                } => {
                    cforce_info!("ExportReport kind={}", kind);
                    self.engine.export(kind, target, result);
                }
            }
        }
    }

    /// Drain every pending engine event as messages, in arrival order.
    pub fn drain(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(event_to_msg)
            .collect()
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress {
            kind,
            run_id,
            increment,
        } => Msg::ProgressTick {
            kind,
            run_id,
            increment,
        },
        EngineEvent::PipelineCompleted {
            kind,
            run_id,
            result,
        } => match result {
            Ok(result) => Msg::PipelineSucceeded { run_id, result },
            Err(err) => {
                cforce_warn!("Run {} failed: {}", run_id, err);
                Msg::PipelineFailed {
                    kind,
                    run_id,
                    failure: map_failure(&err),
                }
            }
        },
        EngineEvent::RunSettled { kind, run_id } => Msg::RunSettled { kind, run_id },
        EngineEvent::AssistantReplied(reply) => Msg::AssistantReplied {
            reply: reply.text,
            fallback: reply.fallback,
        },
        EngineEvent::ExportCompleted { result } => match result {
            Ok(path) => Msg::ExportFinished(ExportOutcome::Written {
                file_name: path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            }),
            Err(err) => {
                cforce_warn!("Export failed: {}", err);
                Msg::ExportFinished(ExportOutcome::Failed)
            }
        },
    }
}

fn map_failure(err: &PipelineError) -> PipelineFailure {
    if err.is_parse() {
        PipelineFailure::Parse
    } else {
        PipelineFailure::Engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cforce_core::PipelineKind;
    use cforce_engine::{GatewayError, ParseError};
    use std::path::PathBuf;

    #[test]
    fn failures_keep_their_category() {
        let parse = PipelineError::new(
            PipelineKind::Scan,
            ParseError {
                kind: PipelineKind::Scan,
                excerpt: "nope".to_string(),
            },
        );
        let gateway = PipelineError::new(PipelineKind::Osint, GatewayError::new("401"));

        assert_eq!(
            event_to_msg(EngineEvent::PipelineCompleted {
                kind: PipelineKind::Scan,
                run_id: 4,
                result: Err(parse),
            }),
            Msg::PipelineFailed {
                kind: PipelineKind::Scan,
                run_id: 4,
                failure: PipelineFailure::Parse,
            }
        );
        assert_eq!(
            event_to_msg(EngineEvent::PipelineCompleted {
                kind: PipelineKind::Osint,
                run_id: 5,
                result: Err(gateway),
            }),
            Msg::PipelineFailed {
                kind: PipelineKind::Osint,
                run_id: 5,
                failure: PipelineFailure::Engine,
            }
        );
    }

    #[test]
    fn export_reports_file_name_only() {
        let msg = event_to_msg(EngineEvent::ExportCompleted {
            result: Ok(PathBuf::from("reports").join("C-FORCE_REPORT_a_com.md")),
        });
        assert_eq!(
            msg,
            Msg::ExportFinished(ExportOutcome::Written {
                file_name: "C-FORCE_REPORT_a_com.md".to_string()
            })
        );
    }
}
