//! `artifacts delete <path>` and `artifacts destroy --upload-path <path>`.

use anyhow::Result;
use artifacts_core::client::Client;
use artifacts_core::resource::{self, UploadState, ARTIFACT_ID_VALUE};
use std::path::PathBuf;

/// Raw DELETE; a missing object is reported as an error.
pub fn run_delete(client: &Client, path: &str) -> Result<()> {
    client.delete(path)?;
    println!("Deleted {}", path);
    Ok(())
}

/// Resource destroy: deletes unless `keep_old_path`, in which case the file is orphaned.
pub fn run_destroy(client: &Client, upload_path: &str, keep_old_path: bool) -> Result<()> {
    resource::delete(client, &destroy_state(upload_path, keep_old_path))?;
    if keep_old_path {
        println!("Orphaned {}", upload_path);
    } else {
        println!("Deleted {}", upload_path);
    }
    Ok(())
}

/// Destroy reads only the path and the delete flag; no local file is involved.
fn destroy_state(upload_path: &str, keep_old_path: bool) -> UploadState {
    UploadState {
        id: ARTIFACT_ID_VALUE.to_string(),
        upload_path: upload_path.to_string(),
        upload_file: PathBuf::new(),
        delete_old_path: !keep_old_path,
        sha1: String::new(),
    }
}
