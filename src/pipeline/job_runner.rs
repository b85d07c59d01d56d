// ジョブ単位: セッション作成 -> ポーリング -> メッシュ取得 -> 処理済みへ移動

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::generation::GenerationParams;
use crate::remote::{MeshService, PollConfig, PollTerminal, poll_session};
use crate::staging::{StagingDirs, mark_processed, stage_artifact};

/// One unit of work: a single concept image to convert.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    /// Image file name, unique within a batch run.
    pub image_id: String,
    /// Location of the image inside the concepts directory.
    pub source_path: PathBuf,
    /// URL under the content host where the remote service fetches the image.
    pub image_url: String,
    pub params: GenerationParams,
}

/// Terminal classification of one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    SubmissionError,
    PollError,
    RemoteFailure,
    Timeout,
    MissingArtifact,
    DownloadError,
    StagingError,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::SubmissionError => "submit_error",
            Self::PollError => "poll_error",
            Self::RemoteFailure => "remote_failure",
            Self::Timeout => "timeout",
            Self::MissingArtifact => "no_mesh",
            Self::DownloadError => "download_error",
            Self::StagingError => "staging_error",
        }
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one job ended. Exactly one Outcome exists per JobDescriptor; every
/// failure mode is a value here, never a propagated error.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub image_id: String,
    /// Present once submission succeeded; keeps the remote handle next to
    /// the human-readable image id in the summary.
    pub session_code: Option<String>,
    /// Present only on success.
    pub artifact_path: Option<PathBuf>,
    pub status: OutcomeStatus,
    /// Human-readable cause, present on any non-success status.
    pub detail: Option<String>,
    /// Credit cost reported by the service, when known.
    pub credits: Option<u64>,
}

fn fail(
    desc: &JobDescriptor,
    status: OutcomeStatus,
    session_code: Option<&str>,
    credits: Option<u64>,
    detail: String,
) -> Outcome {
    warn!(image = %desc.image_id, status = %status, detail = %detail, "job failed");
    Outcome {
        image_id: desc.image_id.clone(),
        session_code: session_code.map(str::to_string),
        artifact_path: None,
        status,
        detail: Some(detail),
        credits,
    }
}

/// Drive one job from submission to its terminal state.
///
/// The state sequence is Submitting -> Polling -> Fetching -> Staging with
/// no backward transitions; each step either advances or terminates with the
/// matching failure status. Infallible at the type level: the caller always
/// receives an Outcome.
pub fn run_job<S: MeshService>(
    service: &S,
    desc: JobDescriptor,
    dirs: &StagingDirs,
    poll: &PollConfig,
) -> Outcome {
    info!(image = %desc.image_id, "processing");

    let session_code = match service.create_session(&desc.image_url, &desc.params) {
        Ok(code) => code,
        Err(e) => return fail(&desc, OutcomeStatus::SubmissionError, None, None, e.to_string()),
    };
    info!(image = %desc.image_id, session_code = %session_code, "session created");

    let session = match poll_session(service, &session_code, poll) {
        Ok(PollTerminal::Complete(session)) => session,
        Ok(PollTerminal::RemoteFailure { detail }) => {
            return fail(
                &desc,
                OutcomeStatus::RemoteFailure,
                Some(&session_code),
                None,
                detail,
            );
        }
        Ok(PollTerminal::TimedOut { waited }) => {
            return fail(
                &desc,
                OutcomeStatus::Timeout,
                Some(&session_code),
                None,
                format!("no terminal status after {}s", waited.as_secs()),
            );
        }
        Err(e) => {
            return fail(
                &desc,
                OutcomeStatus::PollError,
                Some(&session_code),
                None,
                e.to_string(),
            );
        }
    };

    let credits = session.credits;

    // A completed session without a mesh URL breaks the service contract;
    // kept distinct from a remote-reported failure so it can be diagnosed.
    let Some(mesh_url) = session.mesh_url_glb else {
        return fail(
            &desc,
            OutcomeStatus::MissingArtifact,
            Some(&session_code),
            credits,
            "session completed without a mesh URL".to_string(),
        );
    };

    let artifact = match stage_artifact(service, &mesh_url, &dirs.result_dir, &session_code) {
        Ok(path) => path,
        Err(e) => {
            return fail(
                &desc,
                OutcomeStatus::DownloadError,
                Some(&session_code),
                credits,
                e.to_string(),
            );
        }
    };

    // Relocation is strictly last: the artifact is durable before the source
    // stops being listed by the next run.
    if let Err(e) = mark_processed(&desc.source_path, &dirs.processed_dir) {
        return fail(
            &desc,
            OutcomeStatus::StagingError,
            Some(&session_code),
            credits,
            format!("artifact downloaded but source relocation failed: {e}"),
        );
    }

    info!(image = %desc.image_id, artifact = %artifact.display(), "job complete");
    Outcome {
        image_id: desc.image_id,
        session_code: Some(session_code),
        artifact_path: Some(artifact),
        status: OutcomeStatus::Success,
        detail: None,
        credits,
    }
}
