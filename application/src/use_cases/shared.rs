//! Shared utilities for use cases.
//!
//! Contains the bounded, cancellable completion call and exchange logging
//! used by every use case that talks to the gateway.

use crate::ports::exchange_logger::{ExchangeEvent, ExchangeLogger};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use serde_json::json;
use songmaster_domain::{AgentId, FailureKind};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a single upstream call produced no text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("Cancelled")]
    Cancelled,
}

impl CallError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            CallError::Gateway(_) => FailureKind::Transport,
            CallError::TimedOut(_) => FailureKind::Timeout,
            CallError::Cancelled => FailureKind::Cancelled,
        }
    }
}

/// Send one completion request, bounded by `timeout` and `cancel`.
pub(crate) async fn complete_cancellable<G: LlmGateway + ?Sized>(
    gateway: &G,
    request: CompletionRequest,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<String, CallError> {
    if cancel.is_cancelled() {
        return Err(CallError::Cancelled);
    }

    let call = async {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, gateway.complete(request))
                .await
                .map_err(|_| CallError::TimedOut(limit))?
                .map_err(CallError::from),
            None => gateway.complete(request).await.map_err(CallError::from),
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CallError::Cancelled),
        result = call => result,
    }
}

/// Record one upstream exchange.
pub(crate) fn log_exchange(
    logger: &dyn ExchangeLogger,
    event_type: &'static str,
    agent_id: &AgentId,
    request: &CompletionRequest,
    result: &Result<String, CallError>,
    elapsed: Duration,
) {
    let (status, response_chars, error) = match result {
        Ok(text) => ("ok", text.chars().count(), None),
        Err(e) => ("error", 0, Some(e.to_string())),
    };
    logger.log(ExchangeEvent::new(
        event_type,
        json!({
            "agent_id": agent_id,
            "model": request.model,
            "max_tokens": request.max_tokens,
            "prompt_chars": request.prompt_chars(),
            "response_chars": response_chars,
            "elapsed_ms": elapsed.as_millis() as u64,
            "status": status,
            "error": error,
        }),
    ));
}
