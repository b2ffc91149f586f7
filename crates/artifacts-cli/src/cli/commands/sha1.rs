//! `artifacts sha1 <file>`: local digest, as the plan would compute it.

use anyhow::Result;
use artifacts_core::checksum;
use std::path::Path;

/// Compute and print SHA1 of the given file.
pub fn run_sha1(path: &Path) -> Result<()> {
    let digest = checksum::sha1_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
