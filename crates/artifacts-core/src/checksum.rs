//! SHA1 digests of local files.
//!
//! The storage service keys content drift off SHA1, so this is the digest the
//! upload resource plans with and the one sent in `X-Checksum-Sha1`.

use anyhow::{Context, Result};
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA1 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha1_path(path: &Path) -> Result<String> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    sha1_reader(f).with_context(|| format!("read {}", path.display()))
}

/// SHA1 of everything `reader` yields, lowercase hex.
pub fn sha1_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha1::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// SHA1 of an in-memory buffer, lowercase hex.
pub fn sha1_bytes(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}
