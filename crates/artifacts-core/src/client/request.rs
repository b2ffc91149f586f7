//! One libcurl round trip per call.
//!
//! Runs in the current thread. A fresh `Easy` handle is created per request and
//! dropped before returning, so no connection state outlives a call.

use curl::easy::{Auth, Easy, List, ReadError};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use url::Url;

use super::Credentials;

/// Redirect limit for GET and DELETE.
const MAX_REDIRECTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Put,
    Delete,
}

impl Method {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Request body streamed from an open file.
pub(crate) struct Upload<'a> {
    pub path: &'a Path,
    pub file: &'a mut File,
    pub len: u64,
}

/// Status code and raw body of a completed exchange.
#[derive(Debug)]
pub(crate) struct Exchange {
    pub code: u32,
    pub body: Vec<u8>,
}

#[derive(Debug)]
pub(crate) enum TransferError {
    Curl(curl::Error),
    /// Reading the upload body failed; curl aborted the transfer.
    Read(io::Error),
}

impl From<curl::Error> for TransferError {
    fn from(e: curl::Error) -> Self {
        TransferError::Curl(e)
    }
}

/// Performs `method` against `url` with optional basic auth, extra headers and body.
pub(crate) fn perform(
    method: Method,
    url: &Url,
    credentials: Option<&Credentials>,
    headers: &[(&str, &str)],
    mut upload: Option<Upload<'_>>,
) -> Result<Exchange, TransferError> {
    let mut easy = Easy::new();
    easy.url(url.as_str())?;
    match method {
        Method::Get => easy.get(true)?,
        Method::Put => easy.upload(true)?,
        Method::Delete => easy.custom_request("DELETE")?,
    }
    // A streamed PUT body cannot be replayed, so only bodiless requests follow.
    if method != Method::Put {
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
    }

    if let Some(creds) = credentials {
        easy.username(&creds.username)?;
        easy.password(&creds.password)?;
        let mut auth = Auth::new();
        auth.basic(true);
        easy.http_auth(&auth)?;
    }

    let mut list = List::new();
    for (k, v) in headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    if let Some(up) = &upload {
        easy.in_filesize(up.len)?;
        // Send the body right away instead of waiting on 100-continue.
        list.append("Expect:")?;
    }
    easy.http_headers(list)?;

    let mut body = Vec::new();
    let mut read_error: Option<io::Error> = None;
    let outcome = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        if let Some(up) = upload.as_mut() {
            let file = &mut *up.file;
            transfer.read_function(|buf| match file.read(buf) {
                Ok(n) => Ok(n),
                Err(e) => {
                    read_error = Some(e);
                    Err(ReadError::Abort)
                }
            })?;
        }
        transfer.perform()
    };

    if let Err(e) = outcome {
        return Err(match read_error {
            Some(io) => TransferError::Read(io),
            None => TransferError::Curl(e),
        });
    }

    let code = easy.response_code()?;
    Ok(Exchange { code, body })
}
