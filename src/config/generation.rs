use serde::{Deserialize, Serialize};

/// Generation parameters forwarded verbatim with every create-session
/// request. Opaque to the orchestrator: the remote service interprets them,
/// nothing in the pipeline does.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub geometry_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            geometry_model: "turbo".to_string(),
            texture_model: None,
            resolution: None,
            topology: None,
        }
    }
}
