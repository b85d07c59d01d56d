use serde::{Deserialize, Serialize};

use crate::config::generation::GenerationParams;

/// Create-session request body. Generation parameters are flattened next to
/// the image URL, exactly as the service expects them.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub image_url: String,
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// Every API response nests its payload under `data`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionData {
    #[serde(default)]
    pub session_code: Option<String>,
}

/// Remote session lifecycle states. Deliberately closed: a status value this
/// enum does not know is a deserialization error, surfaced as a poll failure,
/// never a silent fall-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Processing,
    Complete,
    Failed,
}

/// Session payload returned by the status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionData {
    pub session_code: String,
    pub session_status: SessionStatus,
    /// Advisory completion percentage; monotonic on the service side but
    /// never load-bearing here.
    #[serde(default)]
    pub percent_done: u8,
    /// Artifact URL, present once the session completes.
    #[serde(default)]
    pub mesh_url_glb: Option<String>,
    /// Credit cost reported by the service, when it reports one.
    #[serde(default)]
    pub credits: Option<u64>,
}
