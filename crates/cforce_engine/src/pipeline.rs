use std::sync::Arc;

use cforce_core::{PipelineKind, PipelineResult};
use cforce_logging::{cforce_info, cforce_warn};

use crate::gateway::{GenerationConfig, ModelGateway, ResponseFormat, ToolSet, Turn};
use crate::{prompt, validate, PipelineError};

/// One intelligence pipeline: prompt, one gateway round trip, validation.
///
/// Stateless between runs. Cancellation is by dropping the future.
#[derive(Clone)]
pub struct Pipeline {
    kind: PipelineKind,
    gateway: Arc<dyn ModelGateway>,
    model: String,
}

impl Pipeline {
    pub fn new(kind: PipelineKind, gateway: Arc<dyn ModelGateway>, model: impl Into<String>) -> Self {
        Self {
            kind,
            gateway,
            model: model.into(),
        }
    }

    /// Web search on, JSON response, no reasoning budget.
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            tools: ToolSet { web_search: true },
            ..GenerationConfig::new(self.model.clone(), ResponseFormat::Json)
        }
    }

    pub async fn run(&self, target: &str) -> Result<PipelineResult, PipelineError> {
        let conversation = [Turn::user(prompt::build(self.kind, target))];
        cforce_info!("{} pipeline dispatch target={target}", self.kind);

        let raw = self
            .gateway
            .send(&conversation, &self.generation_config())
            .await
            .map_err(|err| {
                cforce_warn!("{} pipeline gateway failure: {err}", self.kind);
                PipelineError::new(self.kind, err)
            })?;

        validate::parse(self.kind, &raw).map_err(|err| {
            cforce_warn!("{} pipeline rejected output: {err}", self.kind);
            PipelineError::new(self.kind, err)
        })
    }
}
