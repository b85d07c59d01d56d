//! HTTP implementation of [`MeshService`] for the CSM-style session API.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::generation::GenerationParams;
use crate::error::{MeshBatchError, Result};
use crate::remote::MeshService;
use crate::remote::types::{ApiEnvelope, CreateSessionData, CreateSessionRequest, SessionData};

/// Credential header the service expects on every request.
const API_KEY_HEADER: &str = "x-api-key";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct CsmClient {
    http: Client,
    api_base: String,
    api_key: String,
}

impl CsmClient {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| MeshBatchError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(CsmClient {
            http,
            api_base: api_base.into(),
            api_key: api_key.into(),
        })
    }

    fn session_url(&self, session_code: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), session_code)
    }
}

impl MeshService for CsmClient {
    fn create_session(&self, image_url: &str, params: &GenerationParams) -> Result<String> {
        let request = CreateSessionRequest {
            image_url: image_url.to_string(),
            params: params.clone(),
        };

        let response = self
            .http
            .post(self.api_base.as_str())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| MeshBatchError::submission(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| MeshBatchError::submission(e.to_string()))?;
        if !status.is_success() {
            return Err(MeshBatchError::submission(format!(
                "create session rejected ({status}): {body}"
            )));
        }

        // 成功ステータスでもsession_codeが無ければ失敗扱い
        let envelope: ApiEnvelope<CreateSessionData> = serde_json::from_str(&body)
            .map_err(|_| MeshBatchError::submission(format!("unexpected response: {body}")))?;
        match envelope.data.and_then(|d| d.session_code) {
            Some(code) if !code.is_empty() => Ok(code),
            _ => Err(MeshBatchError::submission(format!(
                "response carries no session code: {body}"
            ))),
        }
    }

    fn fetch_status(&self, session_code: &str) -> Result<SessionData> {
        let response = self
            .http
            .get(self.session_url(session_code))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(|e| MeshBatchError::status(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| MeshBatchError::status(e.to_string()))?;
        if !status.is_success() {
            return Err(MeshBatchError::status(format!(
                "status request rejected ({status}): {body}"
            )));
        }

        let envelope: ApiEnvelope<SessionData> = serde_json::from_str(&body)
            .map_err(|e| MeshBatchError::status(format!("malformed status response: {e}")))?;
        envelope
            .data
            .ok_or_else(|| MeshBatchError::status(format!("status response has no payload: {body}")))
    }

    fn fetch_artifact(&self, url: &str, dest: &Path) -> Result<()> {
        let mut response = self
            .http
            .get(url)
            .send()
            .map_err(|e| MeshBatchError::download(e.to_string()))?;
        if !response.status().is_success() {
            return Err(MeshBatchError::download(format!(
                "artifact request rejected ({})",
                response.status()
            )));
        }

        // 最終パスへはrenameでのみ到達する。途中で失敗した転送は一時
        // ファイルごと破棄され、destに部分書き込みが残ることはない。
        let tmp = dest.with_extension("part");
        let written = (|| -> Result<()> {
            let mut file = fs::File::create(&tmp)?;
            response
                .copy_to(&mut file)
                .map_err(|e| MeshBatchError::download(e.to_string()))?;
            file.sync_all()?;
            Ok(())
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, dest)?;
        Ok(())
    }
}
