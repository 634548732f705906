use std::path::PathBuf;

use cforce_core::{PipelineKind, PipelineResult, RunId};

use crate::assistant::AssistantReply;

/// Events flowing from the engine back to the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress {
        kind: PipelineKind,
        run_id: RunId,
        increment: u8,
    },
    PipelineCompleted {
        kind: PipelineKind,
        run_id: RunId,
        result: Result<PipelineResult, PipelineError>,
    },
    RunSettled {
        kind: PipelineKind,
        run_id: RunId,
    },
    AssistantReplied(AssistantReply),
    ExportCompleted {
        result: Result<PathBuf, String>,
    },
}

/// The remote model could not be reached or gave no usable answer.
///
/// Transport, auth and rate-limit failures are deliberately folded together;
/// `message` is for the diagnostic log only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("model gateway failure: {message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Model output that is not a well-formed result object for `kind`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} output is not a valid result object: {excerpt:?}")]
pub struct ParseError {
    pub kind: PipelineKind,
    /// Leading slice of the raw text.
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineErrorCause {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} pipeline failed: {cause}")]
pub struct PipelineError {
    pub kind: PipelineKind,
    pub cause: PipelineErrorCause,
}

impl PipelineError {
    pub fn new(kind: PipelineKind, cause: impl Into<PipelineErrorCause>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self.cause, PipelineErrorCause::Parse(_))
    }
}
