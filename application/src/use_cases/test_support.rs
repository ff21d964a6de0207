//! Scripted gateway shared by the use case tests.

use crate::ports::exchange_logger::{ExchangeEvent, ExchangeLogger};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use async_trait::async_trait;
use serde_json::{Value, json};
use songmaster_domain::Agent;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// What the gateway answers for one model
#[derive(Clone)]
pub(crate) enum Reply {
    Text(String),
    Fail(GatewayError),
    /// Never answers
    Hang,
    /// Answers after a delay
    Delayed(Duration, String),
}

impl Reply {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    pub(crate) fn json(value: Value) -> Self {
        Reply::Text(value.to_string())
    }

    pub(crate) fn http_500() -> Self {
        Reply::Fail(GatewayError::HttpStatus {
            status: 500,
            message: "OpenRouter error: 500".to_string(),
        })
    }
}

/// Gateway that answers from a per-model script and records every request
#[derive(Default)]
pub(crate) struct MockGateway {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, model: &str, reply: Reply) -> Self {
        self.replies.insert(model.to_string(), reply);
        self
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests_for(&self, model: &str) -> Vec<CompletionRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.model == model)
            .collect()
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError> {
        let reply = self.replies.get(&request.model).cloned();
        self.requests.lock().unwrap().push(request);
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(err)) => Err(err),
            Some(Reply::Hang) => std::future::pending().await,
            Some(Reply::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(GatewayError::RequestFailed("no scripted reply".to_string())),
        }
    }
}

/// Logger that keeps every event in memory
#[derive(Default)]
pub(crate) struct RecordingLogger {
    pub(crate) events: Mutex<Vec<(&'static str, Value)>>,
}

impl ExchangeLogger for RecordingLogger {
    fn log(&self, event: ExchangeEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type, event.payload));
    }
}

/// Agent `id` backed by model `model-<id>`.
pub(crate) fn agent(id: &str) -> Agent {
    Agent::new(id, format!("Agent {}", id), model_of(id))
}

pub(crate) fn model_of(id: &str) -> String {
    format!("model-{}", id)
}

pub(crate) fn song_json(name: &str) -> Value {
    json!({
        "name": name,
        "style": "dream pop, shimmering guitars",
        "lyrics": format!("[Verse]\n{} in the rain\n[Chorus]\nHold on", name),
    })
}
