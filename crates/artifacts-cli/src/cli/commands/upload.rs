//! `artifacts upload <path> <file>`

use anyhow::{Context, Result};
use artifacts_core::client::Client;
use std::path::Path;

pub fn run_upload(client: &Client, path: &str, file: &Path) -> Result<()> {
    client
        .upload(path, file)
        .with_context(|| format!("failure uploading file {}", file.display()))?;
    println!("Uploaded {} to {}", file.display(), path);
    Ok(())
}
