//! HTTP client for an Artifactory-compatible storage service.
//!
//! Three round trips cover the whole upload lifecycle: storage info (checksum
//! lookup), PUT with `X-Checksum-Sha1`, and DELETE. Uses the curl crate
//! (libcurl); every call is synchronous and nothing is retried.

mod connection;
mod error;
mod info;
mod request;

pub use connection::{Connection, Credentials};
pub use error::ClientError;
pub use info::Checksums;

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use url::Url;

use crate::checksum;
use request::{Exchange, Method, TransferError, Upload};

/// Header the service verifies the uploaded body against.
pub const CHECKSUM_SHA1_HEADER: &str = "X-Checksum-Sha1";

/// Credentialed handle on the storage service.
#[derive(Debug, Clone)]
pub struct Client {
    connection: Connection,
}

impl Client {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Checksums of the object at `path`.
    ///
    /// A 404 is not an error: it yields empty checksums. Any status other than
    /// 200 is.
    pub fn checksums(&self, path: &str) -> Result<Checksums, ClientError> {
        let url = self.connection.storage_info_url(path)?;
        let exchange = self.send(Method::Get, &url, &[], None)?;

        if exchange.code == 404 {
            tracing::debug!(url = %url, "no remote object");
            return Ok(Checksums::default());
        }
        expect_status(Method::Get, &url, &exchange, 200)?;

        info::parse_file_info(&exchange.body).map_err(|source| ClientError::Json {
            url: url.to_string(),
            source,
        })
    }

    /// SHA1 of a local file, lowercase hex.
    pub fn sha1(&self, file: &Path) -> Result<String, ClientError> {
        let f = open(file)?;
        checksum::sha1_reader(f).map_err(|source| ClientError::File {
            path: file.to_path_buf(),
            source,
        })
    }

    /// PUT the contents of `file` to `path`, declaring its SHA1. Expects 201.
    pub fn upload(&self, path: &str, file: &Path) -> Result<(), ClientError> {
        let url = self.connection.file_url(path)?;
        let file_err = |source: std::io::Error| ClientError::File {
            path: file.to_path_buf(),
            source,
        };

        let mut f = open(file)?;
        let digest = checksum::sha1_reader(&mut f).map_err(file_err)?;
        let len = f.seek(SeekFrom::End(0)).map_err(file_err)?;
        f.seek(SeekFrom::Start(0)).map_err(file_err)?;

        tracing::debug!(file = %file.display(), sha1 = %digest, len, "uploading");
        let exchange = self
            .send(
                Method::Put,
                &url,
                &[(CHECKSUM_SHA1_HEADER, digest.as_str())],
                Some(Upload {
                    path: file,
                    file: &mut f,
                    len,
                }),
            )?;
        expect_status(Method::Put, &url, &exchange, 201)
    }

    /// DELETE the object at `path`. Expects 204; a missing object is an error.
    pub fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.connection.file_url(path)?;
        let exchange = self.send(Method::Delete, &url, &[], None)?;
        expect_status(Method::Delete, &url, &exchange, 204)
    }

    fn send(
        &self,
        method: Method,
        url: &Url,
        headers: &[(&str, &str)],
        upload: Option<Upload<'_>>,
    ) -> Result<Exchange, ClientError> {
        tracing::debug!(method = method.as_str(), url = %url, "request");
        let body_path = upload.as_ref().map(|u| u.path.to_path_buf());
        let exchange = request::perform(
            method,
            url,
            self.connection.credentials(),
            headers,
            upload,
        )
        .map_err(|e| match e {
            TransferError::Curl(source) => ClientError::Transport {
                method: method.as_str(),
                url: url.to_string(),
                source,
            },
            TransferError::Read(source) => ClientError::File {
                path: body_path.unwrap_or_default(),
                source,
            },
        })?;
        tracing::debug!(method = method.as_str(), url = %url, code = exchange.code, "response");
        Ok(exchange)
    }
}

fn open(file: &Path) -> Result<File, ClientError> {
    File::open(file).map_err(|source| ClientError::File {
        path: file.to_path_buf(),
        source,
    })
}

fn expect_status(
    method: Method,
    url: &Url,
    exchange: &Exchange,
    expected: u32,
) -> Result<(), ClientError> {
    if exchange.code == expected {
        return Ok(());
    }
    tracing::warn!(
        method = method.as_str(),
        url = %url,
        code = exchange.code,
        expected,
        "unexpected status"
    );
    Err(ClientError::Status {
        method: method.as_str(),
        url: url.to_string(),
        code: exchange.code,
    })
}
