use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::config::generation::GenerationParams;
use crate::remote::PollConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the image-to-3d session API.
    pub api_base: String,
    /// Content host prefix under which every concept image is published.
    /// The remote service fetches images itself, so these URLs must be
    /// reachable from outside.
    pub image_base_url: String,
    pub concepts_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub result_dir: PathBuf,
    /// Concurrent session budget. Sized for the remote service's limits,
    /// not the local core count.
    pub workers: usize,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
    pub generation: GenerationParams,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base: "https://api.csm.ai/image-to-3d-sessions".to_string(),
            image_base_url: String::new(),
            concepts_dir: PathBuf::from("concepts"),
            processed_dir: PathBuf::from("processed"),
            result_dir: PathBuf::from("result"),
            workers: 3,
            poll_interval_secs: 10,
            poll_timeout_secs: 600,
            generation: GenerationParams::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::MeshBatchError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Pre-dispatch validation. Anything caught here aborts the run before
    /// a single job is created.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.image_base_url.is_empty() {
            return Err(crate::error::MeshBatchError::config(
                "image_base_url must be set",
            ));
        }
        if self.workers == 0 {
            return Err(crate::error::MeshBatchError::config(
                "workers must be at least 1",
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(crate::error::MeshBatchError::config(
                "poll_interval_secs must be at least 1",
            ));
        }
        if self.poll_timeout_secs < self.poll_interval_secs {
            return Err(crate::error::MeshBatchError::config(
                "poll_timeout_secs must not be shorter than poll_interval_secs",
            ));
        }
        Ok(())
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.poll_interval_secs),
            timeout: Duration::from_secs(self.poll_timeout_secs),
        }
    }
}
