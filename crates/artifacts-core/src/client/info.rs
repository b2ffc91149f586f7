//! Storage info (`GET api/storage/{path}`) response body.

use serde::{Deserialize, Serialize};

/// Checksums the service reports for a stored file.
///
/// An empty `sha1` means the object does not exist remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    #[serde(default)]
    pub sha1: String,
    #[serde(default)]
    pub md5: String,
    #[serde(default)]
    pub sha256: String,
}

impl Checksums {
    /// True when no object exists at the queried path.
    pub fn is_empty(&self) -> bool {
        self.sha1.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    #[serde(default)]
    checksums: Checksums,
}

/// Decode the file info JSON; fields other than `checksums` are ignored.
pub(crate) fn parse_file_info(body: &[u8]) -> Result<Checksums, serde_json::Error> {
    let info: FileInfo = serde_json::from_slice(body)?;
    Ok(info.checksums)
}
