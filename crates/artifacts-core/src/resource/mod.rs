//! `artifacts_upload` resource: lifecycle callbacks for one uploaded artifact.
//!
//! A declarative host calls `diff` while planning and then `create`, `read`,
//! `update` or `delete`. State persistence and plan rendering belong to the
//! host; these functions only translate each callback into store calls.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::ArtifactStore;

/// Resource type name.
pub const UPLOAD_RESOURCE: &str = "artifacts_upload";
pub const UPLOAD_PATH_KEY: &str = "upload_path";
pub const UPLOAD_FILE_KEY: &str = "upload_file";
pub const DELETE_OLD_PATH_KEY: &str = "delete_old_path";
pub const SHA1_KEY: &str = "sha1";

/// Uploaded artifacts are not tracked by an id; every instance uses this value.
pub const ARTIFACT_ID_VALUE: &str = "artifacts_id_value";

fn default_delete_old_path() -> bool {
    true
}

/// Desired configuration of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Path to upload to, relative to the service base URL.
    pub upload_path: String,
    /// Local file containing the content to upload.
    pub upload_file: PathBuf,
    /// When false the remote file is orphaned on destroy or on a change of
    /// `upload_path`.
    #[serde(default = "default_delete_old_path")]
    pub delete_old_path: bool,
}

impl UploadConfig {
    pub fn new(upload_path: impl Into<String>, upload_file: impl Into<PathBuf>) -> Self {
        Self {
            upload_path: upload_path.into(),
            upload_file: upload_file.into(),
            delete_old_path: true,
        }
    }
}

/// Recorded state of an upload, as a host would persist it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadState {
    pub id: String,
    pub upload_path: String,
    pub upload_file: PathBuf,
    pub delete_old_path: bool,
    /// SHA1 the service reports for `upload_path`.
    pub sha1: String,
}

impl UploadState {
    /// State for `config` before anything is known about the remote side.
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            id: ARTIFACT_ID_VALUE.to_string(),
            upload_path: config.upload_path.clone(),
            upload_file: config.upload_file.clone(),
            delete_old_path: config.delete_old_path,
            sha1: String::new(),
        }
    }
}

/// What applying a configuration would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    Create,
    Update,
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPlan {
    pub action: PlanAction,
    /// SHA1 of the local file; becomes `sha1` once applied.
    pub planned_sha1: String,
    /// True when the prior remote path would be replaced.
    pub path_changed: bool,
}

/// Upload the configured file, then read back the recorded checksum.
///
/// Returns `None` if the service reports nothing at `upload_path` afterwards.
pub fn create<S: ArtifactStore + ?Sized>(
    store: &S,
    config: &UploadConfig,
) -> Result<Option<UploadState>> {
    let file = absolute(&config.upload_file)?;
    store
        .upload(&config.upload_path, &file)
        .with_context(|| format!("failure uploading file {}", file.display()))?;
    tracing::info!(path = %config.upload_path, file = %file.display(), "uploaded artifact");

    read(store, &UploadState::from_config(config))
}

/// Refresh `state` from the service.
///
/// An empty remote digest means the object is gone: `None` tells the host to
/// drop the resource so the next plan recreates it.
pub fn read<S: ArtifactStore + ?Sized>(
    store: &S,
    state: &UploadState,
) -> Result<Option<UploadState>> {
    let checksums = store.checksums(&state.upload_path)?;
    if checksums.is_empty() {
        tracing::info!(path = %state.upload_path, "remote artifact missing");
        return Ok(None);
    }
    Ok(Some(UploadState {
        sha1: checksums.sha1,
        ..state.clone()
    }))
}

/// Move from `prior` to `config`.
///
/// When the path changed and `delete_old_path` is set, the old object is
/// deleted before the new upload.
pub fn update<S: ArtifactStore + ?Sized>(
    store: &S,
    prior: &UploadState,
    config: &UploadConfig,
) -> Result<Option<UploadState>> {
    if prior.upload_path != config.upload_path {
        if config.delete_old_path {
            store
                .delete(&prior.upload_path)
                .with_context(|| format!("failure deleting old path {}", prior.upload_path))?;
            tracing::info!(path = %prior.upload_path, "deleted old path");
        } else {
            tracing::info!(path = %prior.upload_path, "orphaning old path");
        }
    }

    create(store, config)
}

/// Destroy the resource. The remote object is only removed when `delete_old_path` is set.
pub fn delete<S: ArtifactStore + ?Sized>(store: &S, state: &UploadState) -> Result<()> {
    if !state.delete_old_path {
        tracing::info!(path = %state.upload_path, "orphaning remote artifact");
        return Ok(());
    }
    store
        .delete(&state.upload_path)
        .context("error attempting delete")?;
    tracing::info!(path = %state.upload_path, "deleted remote artifact");
    Ok(())
}

/// Plan a change: the local file's SHA1 is the planned `sha1`, and any
/// difference from `prior` (including remote content drift) calls for an update.
pub fn diff<S: ArtifactStore + ?Sized>(
    store: &S,
    config: &UploadConfig,
    prior: Option<&UploadState>,
) -> Result<UploadPlan> {
    let planned_sha1 = store.sha1(&config.upload_file)?;

    let (action, path_changed) = match prior {
        None => (PlanAction::Create, false),
        Some(p) => {
            let path_changed = p.upload_path != config.upload_path;
            let changed = path_changed
                || p.upload_file != config.upload_file
                || p.delete_old_path != config.delete_old_path
                || p.sha1 != planned_sha1;
            let action = if changed {
                PlanAction::Update
            } else {
                PlanAction::NoOp
            };
            (action, path_changed)
        }
    };

    tracing::debug!(?action, path_changed, sha1 = %planned_sha1, "planned upload");
    Ok(UploadPlan {
        action,
        planned_sha1,
        path_changed,
    })
}

/// Plan, then create or update as needed. `prior` is returned unchanged for a no-op.
pub fn apply<S: ArtifactStore + ?Sized>(
    store: &S,
    config: &UploadConfig,
    prior: Option<&UploadState>,
) -> Result<Option<UploadState>> {
    let plan = diff(store, config, prior)?;
    apply_plan(store, config, prior, &plan)
}

/// Carry out a plan already produced by `diff`.
///
/// Without a prior state every action creates; with one, anything but a
/// no-op goes through `update`.
pub fn apply_plan<S: ArtifactStore + ?Sized>(
    store: &S,
    config: &UploadConfig,
    prior: Option<&UploadState>,
    plan: &UploadPlan,
) -> Result<Option<UploadState>> {
    match (plan.action, prior) {
        (PlanAction::NoOp, Some(p)) => Ok(Some(p.clone())),
        (_, Some(p)) => update(store, p, config),
        (_, None) => create(store, config),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("unable to determine current directory")?;
    Ok(cwd.join(path))
}
