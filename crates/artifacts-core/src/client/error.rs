//! Errors surfaced by the storage client.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure is terminal for the call that produced it; nothing here is retried.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme {scheme:?} in base URL {url} (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("username {username:?} set, but password unset")]
    MissingPassword { username: String },

    #[error("remote path is empty")]
    EmptyPath,

    #[error("unable to read file {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to perform {method} request to {url}: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("response from {method} {url}: HTTP {code}")]
    Status {
        method: &'static str,
        url: String,
        code: u32,
    },

    #[error("unable to deserialize storage info from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// HTTP status for `Status` errors.
    pub fn status_code(&self) -> Option<u32> {
        match self {
            ClientError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
