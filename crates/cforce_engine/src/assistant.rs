use std::sync::Arc;

use cforce_core::{ChatMessage, ChatRole, ContextSnapshot};
use cforce_logging::{cforce_debug, cforce_warn};

use crate::gateway::{GenerationConfig, ModelGateway, ResponseFormat, Turn};

pub const SYSTEM_INSTRUCTION: &str = "You are the built-in AI Security Assistant of C-Force AI.
Your role is to help users understand scan results, security risks and recommended mitigations in a clear, professional and ethical way.

Core responsibilities:
- Explain scan results in simple, human-readable language.
- Help users understand what each vulnerability means, why it matters and how risky it is.
- Provide defensive and remediation guidance only.

Strict rules:
- Do NOT provide exploits, payloads, attack instructions, brute-force techniques or any step-by-step hacking guidance.
- You MAY provide security best practices, configuration recommendations, patch and update advice, defensive mitigation steps and references to public documentation (OWASP, NIST, CVE).

Response style:
- Professional SOC / cyber analyst tone.
- Clear and concise, no fear-mongering, no unnecessary jargon.
- Structured answers with bullet points when helpful.

Legal and ethical notice: assume the user is assessing systems they own or are authorized to test. Always encourage responsible and legal security practices.";

/// Reply used whenever the gateway fails. Never an error to the caller.
pub const FALLBACK_REPLY: &str = "CORE_CHAT_ERROR: Could not establish secure AI connection.";
/// Reply used when the model answers with no text.
pub const EMPTY_REPLY: &str = "No response received.";
pub const NO_CONTEXT_MARKER: &str = "NO_SCAN_CONTEXT_AVAILABLE";
const CONTEXT_PREFIX: &str = "CURRENT_SCAN_CONTEXT: ";

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    /// Set when `text` is [`FALLBACK_REPLY`].
    pub fallback: bool,
}

impl AssistantReply {
    fn answer(text: String) -> Self {
        Self {
            text,
            fallback: false,
        }
    }

    fn fallback() -> Self {
        Self {
            text: FALLBACK_REPLY.to_string(),
            fallback: true,
        }
    }
}

/// Context-grounded, defensive-only security chat.
#[derive(Clone)]
pub struct AssistantPipeline {
    gateway: Arc<dyn ModelGateway>,
    model: String,
}

impl AssistantPipeline {
    pub fn new(gateway: Arc<dyn ModelGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: Some(TEMPERATURE),
            top_p: Some(TOP_P),
            system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
            ..GenerationConfig::new(self.model.clone(), ResponseFormat::Text)
        }
    }

    /// History in order, then one user turn carrying the context block and the query.
    pub fn build_conversation(
        query: &str,
        history: &[ChatMessage],
        context: &ContextSnapshot,
    ) -> Vec<Turn> {
        let context_block = match context.report() {
            Some(result) => format!("{CONTEXT_PREFIX}{}", result.to_json()),
            None => NO_CONTEXT_MARKER.to_string(),
        };
        history
            .iter()
            .map(|message| match message.role {
                ChatRole::User => Turn::user(message.content.clone()),
                ChatRole::Assistant => Turn::model(message.content.clone()),
            })
            .chain(std::iter::once(Turn::user(format!(
                "{context_block}\n\nUSER_QUERY: {query}"
            ))))
            .collect()
    }

    pub async fn ask(
        &self,
        query: &str,
        history: &[ChatMessage],
        context: &ContextSnapshot,
    ) -> AssistantReply {
        let conversation = Self::build_conversation(query, history, context);
        cforce_debug!(
            "assistant dispatch turns={} grounded={}",
            conversation.len(),
            context.report().is_some()
        );
        match self.gateway.send(&conversation, &self.generation_config()).await {
            Ok(text) if text.trim().is_empty() => AssistantReply::answer(EMPTY_REPLY.to_string()),
            Ok(text) => AssistantReply::answer(text),
            Err(err) => {
                cforce_warn!("assistant gateway failure: {err}");
                AssistantReply::fallback()
            }
        }
    }
}
