//! Error responses for the HTTP API
//!
//! Every failure is rendered as `{"error": "<message>"}`. A round in which
//! every agent failed also carries `failed_agents`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use songmaster_application::{
    EvaluateRoundError, GenerateArtistsError, GenerateRoundError, IterateRoundError,
};
use songmaster_domain::DomainError;
use tracing::warn;

use super::dto::failed_agents;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub failed_agents: Option<Value>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            failed_agents: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            failed_agents: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, "{}", self.message);
        }
        let mut body = json!({ "error": self.message });
        if let Some(failed) = self.failed_agents {
            body["failed_agents"] = failed;
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<GenerateRoundError> for ApiError {
    fn from(e: GenerateRoundError) -> Self {
        match &e {
            GenerateRoundError::NoAgents => Self::bad_request(e.to_string()),
            GenerateRoundError::AllAgentsFailed { failures } => Self {
                failed_agents: serde_json::to_value(failed_agents(failures)).ok(),
                ..Self::internal(e.to_string())
            },
            GenerateRoundError::Domain(DomainError::DuplicateAgent(_)) => {
                Self::bad_request(e.to_string())
            }
            GenerateRoundError::Domain(_) => Self::internal(e.to_string()),
        }
    }
}

impl From<IterateRoundError> for ApiError {
    fn from(e: IterateRoundError) -> Self {
        let message = e.to_string();
        let IterateRoundError::Generation { source, .. } = e;
        Self {
            message,
            ..Self::from(source)
        }
    }
}

impl From<EvaluateRoundError> for ApiError {
    fn from(e: EvaluateRoundError) -> Self {
        match e {
            EvaluateRoundError::NoCandidates => Self::bad_request(e.to_string()),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<GenerateArtistsError> for ApiError {
    fn from(e: GenerateArtistsError) -> Self {
        match e {
            GenerateArtistsError::EmptyInput => Self::bad_request(e.to_string()),
            other => Self::internal(other.to_string()),
        }
    }
}
