//! Artifact staging: durable placement of downloaded meshes and the
//! mark-processed relocation of source images.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MeshBatchError, Result};
use crate::remote::MeshService;

/// Output directories shared by every job in a batch. Jobs never contend on
/// a single path inside them: each job owns a distinct image/artifact pair.
#[derive(Debug, Clone)]
pub struct StagingDirs {
    pub result_dir: PathBuf,
    pub processed_dir: PathBuf,
}

/// Deterministic artifact location, keyed by the remote session code so
/// repeated runs over the same image never overwrite an unrelated artifact.
pub fn artifact_path(result_dir: &Path, session_code: &str) -> PathBuf {
    result_dir.join(format!("{session_code}.glb"))
}

/// Download the mesh into the result directory, creating it if absent.
pub fn stage_artifact<S: MeshService>(
    service: &S,
    mesh_url: &str,
    result_dir: &Path,
    session_code: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(result_dir)?;
    let dest = artifact_path(result_dir, session_code);
    service.fetch_artifact(mesh_url, &dest)?;
    Ok(dest)
}

/// Relocate a fully processed source image into the processed directory.
///
/// Must be the last action of a successful job: the artifact is already
/// durably written, so a crash before this point leaves the image in place
/// and re-submittable with no data loss.
pub fn mark_processed(source: &Path, processed_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(processed_dir)?;
    let file_name = source.file_name().ok_or_else(|| {
        MeshBatchError::staging(format!("source has no file name: {}", source.display()))
    })?;
    let dest = processed_dir.join(file_name);

    match fs::rename(source, &dest) {
        Ok(()) => Ok(dest),
        // ファイルシステムをまたぐ移動はrenameできないのでcopy+removeで代替
        Err(_) => {
            fs::copy(source, &dest)?;
            fs::remove_file(source)?;
            Ok(dest)
        }
    }
}
