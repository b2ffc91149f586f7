//! Storage interface the upload resource is written against.
//!
//! `Client` is the only production implementation; the resource adapter only
//! depends on this trait so its lifecycle can be driven without a server.

use std::path::Path;

use crate::client::{Checksums, Client, ClientError};

/// Remote operations needed to manage one uploaded artifact.
pub trait ArtifactStore {
    /// Checksums at `path`; empty when nothing is stored there.
    fn checksums(&self, path: &str) -> Result<Checksums, ClientError>;
    /// SHA1 of a local file.
    fn sha1(&self, file: &Path) -> Result<String, ClientError>;
    fn upload(&self, path: &str, file: &Path) -> Result<(), ClientError>;
    fn delete(&self, path: &str) -> Result<(), ClientError>;
}

impl ArtifactStore for Client {
    fn checksums(&self, path: &str) -> Result<Checksums, ClientError> {
        Client::checksums(self, path)
    }

    fn sha1(&self, file: &Path) -> Result<String, ClientError> {
        Client::sha1(self, file)
    }

    fn upload(&self, path: &str, file: &Path) -> Result<(), ClientError> {
        Client::upload(self, path, file)
    }

    fn delete(&self, path: &str) -> Result<(), ClientError> {
        Client::delete(self, path)
    }
}
