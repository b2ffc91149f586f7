//! `artifacts checksum <path>`: remote digest.

use anyhow::Result;
use artifacts_core::client::Client;

/// Print the remote SHA1, or note that nothing is stored at `path`. Absence is not an error.
pub fn run_checksum(client: &Client, path: &str) -> Result<()> {
    let checksums = client.checksums(path)?;
    if checksums.is_empty() {
        println!("no object at {}", path);
    } else {
        println!("{}  {}", checksums.sha1, path);
    }
    Ok(())
}
