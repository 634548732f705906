#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use cforce_engine::{GatewayError, GenerationConfig, ModelGateway, Turn};

/// In-memory gateway replaying canned replies and recording every call.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: Mutex<Vec<(Vec<Turn>, GenerationConfig)>>,
}

impl ScriptedGateway {
    pub fn replying(replies: impl IntoIterator<Item = Result<String, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(text: &str) -> Self {
        Self::replying([Ok(text.to_string())])
    }

    pub fn failing() -> Self {
        Self::replying([Err(GatewayError::new("connection refused"))])
    }

    pub fn calls(&self) -> Vec<(Vec<Turn>, GenerationConfig)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ModelGateway for ScriptedGateway {
    async fn send(
        &self,
        conversation: &[Turn],
        config: &GenerationConfig,
    ) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((conversation.to_vec(), config.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::new("script exhausted")))
    }
}
