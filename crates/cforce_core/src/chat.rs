use crate::{PipelineKind, PipelineResult};

/// Order in which result slots are consulted to ground an assistant reply.
pub const CONTEXT_PRECEDENCE: [PipelineKind; 3] =
    [PipelineKind::Scan, PipelineKind::Osint, PipelineKind::IpTrace];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The single prior result grounding one chat query, captured when the query is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextSnapshot {
    Report(PipelineResult),
    NoContext,
}

impl ContextSnapshot {
    /// First present result in [`CONTEXT_PRECEDENCE`] order.
    pub fn select<'a, F>(lookup: F) -> Self
    where
        F: Fn(PipelineKind) -> Option<&'a PipelineResult>,
    {
        CONTEXT_PRECEDENCE
            .iter()
            .find_map(|kind| lookup(*kind))
            .cloned()
            .map_or(ContextSnapshot::NoContext, ContextSnapshot::Report)
    }

    pub fn report(&self) -> Option<&PipelineResult> {
        match self {
            ContextSnapshot::Report(result) => Some(result),
            ContextSnapshot::NoContext => None,
        }
    }
}
