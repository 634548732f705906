//! C-Force engine: model gateway, pipelines and effect execution.
mod assistant;
mod engine;
mod export;
mod filename;
mod gateway;
mod persist;
mod pipeline;
mod prompt;
mod ramp;
mod types;
mod validate;

pub use assistant::{
    AssistantPipeline, AssistantReply, EMPTY_REPLY, FALLBACK_REPLY, NO_CONTEXT_MARKER,
    SYSTEM_INSTRUCTION,
};
pub use engine::{EngineConfig, EngineError, EngineHandle, SETTLE_DELAY};
pub use export::{render_report, write_report, ExportError};
pub use filename::report_filename;
pub use gateway::{
    GatewaySettings, GeminiGateway, GenerationConfig, ModelGateway, ResponseFormat, Role,
    ToolSet, Turn, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use persist::{PersistError, ReportWriter};
pub use pipeline::Pipeline;
pub use prompt::build as build_prompt;
pub use ramp::{ChannelProgressSink, ProgressRamp, ProgressSink, MAX_INCREMENT, RAMP_INTERVAL};
pub use types::{EngineEvent, GatewayError, ParseError, PipelineError, PipelineErrorCause};
pub use validate::{parse as parse_result, EXCERPT_LEN};
